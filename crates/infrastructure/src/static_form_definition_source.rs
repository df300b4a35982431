use std::time::Duration;

use async_trait::async_trait;
use formloom_application::FormDefinitionSource;
use formloom_core::AppResult;
use formloom_domain::FormDefinitionPayload;
use tokio::sync::RwLock;

use crate::sample_forms::SampleForm;

/// In-memory form definition source.
///
/// Answers every fetch with the stored payload after an optional delay.
pub struct StaticFormDefinitionSource {
    payload: RwLock<FormDefinitionPayload>,
    latency: Duration,
}

impl StaticFormDefinitionSource {
    /// Creates a source answering with `payload`.
    #[must_use]
    pub fn new(payload: FormDefinitionPayload) -> Self {
        Self {
            payload: RwLock::new(payload),
            latency: Duration::ZERO,
        }
    }

    /// Creates a source answering with a bundled sample.
    pub fn sample(sample: SampleForm) -> AppResult<Self> {
        Ok(Self::new(sample.payload()?))
    }

    /// Delays every fetch by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Replaces the payload served by later fetches.
    pub async fn replace(&self, payload: FormDefinitionPayload) {
        *self.payload.write().await = payload;
    }
}

#[async_trait]
impl FormDefinitionSource for StaticFormDefinitionSource {
    async fn fetch_form_definition(&self) -> AppResult<FormDefinitionPayload> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        Ok(self.payload.read().await.clone())
    }
}
