//! Headless form session against a live form backend.
//!
//! Loads the configured form definition, fills it from an answers file and
//! submits it, logging every step.

#![forbid(unsafe_code)]

use std::env;
use std::fs;
use std::sync::Arc;

use formloom_application::{
    FieldTreeProcessor, FormDefinitionStore, FormSession, MessageLocale, SubmitOutcome,
    ValidationMessageCatalog,
};
use formloom_core::{AppError, AppResult};
use formloom_domain::{FieldDescription, FieldProps};
use formloom_infrastructure::{
    FormApiConfig, HttpFormDefinitionSource, HttpSubmissionTransport, SystemDeviceMetadataProvider,
};
use serde_json::{Map, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct RunnerConfig {
    api: FormApiConfig,
    locale: MessageLocale,
    answers_path: Option<String>,
    save_as_draft: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = RunnerConfig::load()?;
    let http_client = config.api.build_http_client()?;
    let store = FormDefinitionStore::new(
        Arc::new(HttpFormDefinitionSource::new(http_client.clone(), &config.api)),
        Arc::new(HttpSubmissionTransport::new(http_client, &config.api)),
        FieldTreeProcessor::new(ValidationMessageCatalog::new(config.locale)),
    );
    let mut session = FormSession::new(store, Arc::new(SystemDeviceMetadataProvider::from_env()))
        .with_fallback_fields(local_fields());

    info!(
        form_definition_url = %config.api.form_definition_url(),
        locale = ?config.locale,
        "starting form session"
    );
    session.start().await;

    let state = session.store().snapshot();
    if let Some(error) = state.error.as_deref() {
        warn!(error, "form definition unavailable, using the local form");
    }
    let stats = state.form_stats();
    info!(
        form_name = state.form_name.as_deref().unwrap_or("local form"),
        field_count = state.field_count(),
        required = stats.required,
        optional = stats.optional,
        types = %stats.types.join(","),
        controls = session.control_paths().len(),
        "form ready"
    );

    let Some(answers_path) = config.answers_path.as_deref() else {
        info!("FORMLOOM_ANSWERS_PATH not set, nothing to submit");
        return Ok(());
    };

    for (path, value) in read_answers(answers_path)? {
        if let Err(error) = session.set_value(&path, value) {
            warn!(path = %path, error = %error, "skipping answer without a matching control");
        }
    }

    if config.save_as_draft {
        let response = session.save_draft().await?;
        info!(%response, "draft saved");
        return Ok(());
    }

    match session.submit().await? {
        SubmitOutcome::Invalid(errors) => {
            for error in &errors {
                warn!(
                    field = %error.field_key,
                    rule = %error.error_type,
                    message = %error.message,
                    "invalid answer"
                );
            }
            Err(AppError::Validation(format!(
                "{} answers failed validation",
                errors.len()
            )))
        }
        SubmitOutcome::Submitted { request, response } => {
            info!(
                form_definition_id = %request.form_definition_id,
                completion_time = request.completion_time,
                %response,
                "form submitted"
            );
            Ok(())
        }
    }
}

impl RunnerConfig {
    fn load() -> AppResult<Self> {
        let locale = match env::var("FORMLOOM_MESSAGE_LOCALE") {
            Ok(value) if !value.trim().is_empty() => {
                MessageLocale::parse(&value).ok_or_else(|| {
                    AppError::Validation(format!(
                        "FORMLOOM_MESSAGE_LOCALE must be 'en' or 'es', got '{value}'"
                    ))
                })?
            }
            _ => MessageLocale::default(),
        };

        Ok(Self {
            api: FormApiConfig::load()?,
            locale,
            answers_path: env::var("FORMLOOM_ANSWERS_PATH")
                .ok()
                .filter(|value| !value.trim().is_empty()),
            save_as_draft: env::var("FORMLOOM_SAVE_AS_DRAFT")
                .unwrap_or_else(|_| "false".to_owned())
                .eq_ignore_ascii_case("true"),
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

/// Reads a JSON object of control path to value.
fn read_answers(path: &str) -> AppResult<Map<String, Value>> {
    let raw = fs::read_to_string(path)
        .map_err(|error| AppError::Validation(format!("failed to read answers '{path}': {error}")))?;

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(answers)) => Ok(answers),
        Ok(_) => Err(AppError::Validation(format!(
            "answers '{path}' must be a JSON object"
        ))),
        Err(error) => Err(AppError::Decode(format!(
            "answers '{path}' are not valid JSON: {error}"
        ))),
    }
}

fn local_fields() -> Vec<FieldDescription> {
    vec![
        FieldDescription::leaf("username", "input").with_props(
            FieldProps::new()
                .with("label", "Username")
                .with("placeholder", "Enter your username")
                .with("required", true)
                .with("minLength", 3)
                .with("maxLength", 20),
        ),
    ]
}
