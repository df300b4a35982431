use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use formloom_core::{AppError, AppResult};
use formloom_domain::{CreateSubmissionRequest, FieldDescription};
use serde_json::{Map, Value};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::field_processor::FieldTreeProcessor;
use crate::form_ports::{FormDefinitionSource, SubmissionTransport};

mod state;

pub use state::{FormState, LoadStatus};

const SUBMIT_ERROR_MESSAGE: &str = "Error sending the form";

/// Holds the loaded form definition and publishes every change.
///
/// Each `load` and `reset` starts a new generation. A fetch that lands after
/// its generation was superseded is dropped without touching state, so a slow
/// earlier load can never overwrite a newer one or a reset.
#[derive(Clone)]
pub struct FormDefinitionStore {
    source: Arc<dyn FormDefinitionSource>,
    transport: Arc<dyn SubmissionTransport>,
    processor: FieldTreeProcessor,
    state: Arc<watch::Sender<FormState>>,
    generation: Arc<AtomicU64>,
}

impl FormDefinitionStore {
    /// Creates an idle store.
    #[must_use]
    pub fn new(
        source: Arc<dyn FormDefinitionSource>,
        transport: Arc<dyn SubmissionTransport>,
        processor: FieldTreeProcessor,
    ) -> Self {
        let (state, _) = watch::channel(FormState::default());
        Self {
            source,
            transport,
            processor,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns the processor applied to fetched trees.
    #[must_use]
    pub fn processor(&self) -> &FieldTreeProcessor {
        &self.processor
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> FormState {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes. Dropping the receiver unsubscribes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.state.subscribe()
    }

    /// Returns whether a fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Fetches, processes and stores the form definition.
    ///
    /// Failures end in the error state with a user-facing message; they are
    /// never returned to the caller.
    pub async fn load(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        let mut guard = LoadingGuard {
            state: &self.state,
            generation: &self.generation,
            owner: generation,
            armed: true,
        };
        debug!(generation, "loading form definition");

        let outcome = self
            .source
            .fetch_form_definition()
            .await
            .map(|payload| self.processor.process_payload(payload));

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding superseded form definition load");
            return;
        }

        match &outcome {
            Ok(definition) => info!(
                form_name = %definition.name(),
                form_definition_id = %definition.id(),
                version = definition.version(),
                top_level_fields = definition.fields().len(),
                "form definition loaded"
            ),
            Err(error) => warn!(
                status = error.status_code(),
                error = %error,
                "failed to load form definition"
            ),
        }

        self.state.send_modify(|state| {
            match outcome {
                Ok(definition) => {
                    state.form_name = Some(definition.name().to_owned());
                    state.form_definition_id = Some(definition.id().clone());
                    state.version = Some(definition.version());
                    state.description = definition.description().map(ToOwned::to_owned);
                    state.fields = definition.into_fields();
                    state.last_updated = Some(Utc::now());
                }
                Err(error) => {
                    state.error = Some(error.user_message());
                }
            }
            state.loading = false;
        });
        guard.armed = false;
    }

    /// Loads again unless a fetch is already in flight.
    pub async fn retry(&self) {
        if self.is_loading() {
            debug!("retry ignored while a form definition load is in flight");
            return;
        }

        self.load().await;
    }

    /// Clears all state back to the initial values.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(FormState::default());
        debug!("form definition store reset");
    }

    /// Finds a top-level field by key.
    #[must_use]
    pub fn get_field_by_key(&self, key: &str) -> Option<FieldDescription> {
        self.state.borrow().get_field_by_key(key).cloned()
    }

    /// Merges `partial` into the top-level field matching `key`.
    ///
    /// Top-level entries of `partial` replace the field's entries, except
    /// objects (such as `props`) which are merged one level deep. Returns the
    /// resulting tree; when no field matches the tree is returned unchanged.
    pub fn update_field(
        &self,
        key: &str,
        partial: &Map<String, Value>,
    ) -> AppResult<Vec<FieldDescription>> {
        let current = self.snapshot();
        let Some(index) = current
            .fields
            .iter()
            .position(|field| field.key() == Some(key))
        else {
            return Ok(current.fields);
        };

        let updated = merge_field(&current.fields[index], partial)?;
        let mut fields = current.fields;
        fields[index] = updated;

        self.state.send_modify(|state| state.fields = fields.clone());
        Ok(fields)
    }

    /// Posts a submission through the configured transport.
    pub async fn submit(&self, request: &CreateSubmissionRequest) -> AppResult<Value> {
        self.state.send_modify(|state| state.submitting = true);

        let result = self.transport.submit(request).await;

        self.state.send_modify(|state| {
            state.submitting = false;
            if result.is_err() {
                state.error = Some(SUBMIT_ERROR_MESSAGE.to_owned());
            }
        });

        match &result {
            Ok(response) => info!(
                form_definition_id = %request.form_definition_id,
                is_complete = request.is_complete,
                response = %response,
                "form submitted"
            ),
            Err(error) => warn!(
                form_definition_id = %request.form_definition_id,
                error = %error,
                "failed to submit form"
            ),
        }

        result
    }
}

/// Clears the loading flag when a load is dropped before it completes.
///
/// Only the load owning the current generation may clear it.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<FormState>,
    generation: &'a AtomicU64,
    owner: u64,
    armed: bool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.armed && self.generation.load(Ordering::SeqCst) == self.owner {
            debug!(generation = self.owner, "form definition load dropped before completion");
            self.state.send_modify(|state| state.loading = false);
        }
    }
}

fn merge_field(field: &FieldDescription, partial: &Map<String, Value>) -> AppResult<FieldDescription> {
    let mut value = serde_json::to_value(field)
        .map_err(|error| AppError::Internal(format!("failed to encode field: {error}")))?;

    if let Value::Object(object) = &mut value {
        for (name, update) in partial {
            match (object.get_mut(name), update) {
                (Some(Value::Object(existing)), Value::Object(update)) => {
                    for (inner_name, inner_value) in update {
                        existing.insert(inner_name.clone(), inner_value.clone());
                    }
                }
                _ => {
                    object.insert(name.clone(), update.clone());
                }
            }
        }
    }

    serde_json::from_value(value)
        .map_err(|error| AppError::Validation(format!("invalid field update: {error}")))
}

#[cfg(test)]
mod tests;
