use std::env;

use formloom_application::DeviceMetadataProvider;
use formloom_domain::{DeviceType, SubmissionMetadata};

use crate::form_api_config::CLIENT_USER_AGENT;

/// Describes the machine the process runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemDeviceMetadataProvider {
    user_agent: String,
    language: Option<String>,
    timezone: Option<String>,
}

impl SystemDeviceMetadataProvider {
    /// Creates a provider with explicit values.
    #[must_use]
    pub fn new(
        user_agent: impl Into<String>,
        language: Option<String>,
        timezone: Option<String>,
    ) -> Self {
        Self {
            user_agent: user_agent.into(),
            language,
            timezone,
        }
    }

    /// Reads the locale from `LC_ALL`/`LANG` and the zone from `TZ`.
    #[must_use]
    pub fn from_env() -> Self {
        let language = env::var("LC_ALL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .or_else(|| env::var("LANG").ok())
            .and_then(|value| language_tag(&value));
        let timezone = env::var("TZ")
            .ok()
            .map(|value| value.trim_start_matches(':').to_owned())
            .filter(|value| !value.is_empty());

        Self::new(CLIENT_USER_AGENT, language, timezone)
    }
}

impl DeviceMetadataProvider for SystemDeviceMetadataProvider {
    fn metadata(&self) -> SubmissionMetadata {
        SubmissionMetadata {
            browser_info: Some(self.user_agent.clone()),
            language: self.language.clone(),
            device_type: Some(DeviceType::from_user_agent(&self.user_agent)),
            os: Some(env::consts::OS.to_owned()),
            timezone: self.timezone.clone(),
            ..SubmissionMetadata::default()
        }
    }
}

/// Converts a POSIX locale (`es_CO.UTF-8`) into a language tag (`es-CO`).
fn language_tag(locale: &str) -> Option<String> {
    let name = locale.split(['.', '@']).next()?.trim();
    if name.is_empty() || name == "C" || name == "POSIX" {
        return None;
    }

    Some(name.replace('_', "-"))
}
