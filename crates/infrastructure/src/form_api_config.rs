use std::env;
use std::time::Duration;

use formloom_core::{AppError, AppResult};
use url::Url;

/// Client identification sent with every request and recorded in submissions.
pub const CLIENT_USER_AGENT: &str = concat!("formloom/", env!("CARGO_PKG_VERSION"));

const DEFAULT_BASE_URL: &str = "https://localhost:7261";
const DEFAULT_FORM_DEFINITION_PATH: &str = "/api/DynamicForm/get-form-definition";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const SUBMIT_SEGMENT: &str = "/submit";

/// Location of the form backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormApiConfig {
    base_url: Url,
    form_definition_path: String,
    timeout: Duration,
}

impl FormApiConfig {
    /// Creates a config for `base_url` with default path and timeout.
    pub fn new(base_url: &str) -> AppResult<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            form_definition_path: normalize_path(DEFAULT_FORM_DEFINITION_PATH),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Loads the config from process environment.
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads the config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let base_url = non_empty(lookup("FORMLOOM_API_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let form_definition_path = non_empty(lookup("FORMLOOM_FORM_DEFINITION_PATH"))
            .unwrap_or_else(|| DEFAULT_FORM_DEFINITION_PATH.to_owned());
        let timeout_secs = match non_empty(lookup("FORMLOOM_HTTP_TIMEOUT_SECS")) {
            Some(value) => value.trim().parse::<u64>().map_err(|error| {
                AppError::Validation(format!(
                    "FORMLOOM_HTTP_TIMEOUT_SECS must be a whole number of seconds: {error}"
                ))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url: parse_base_url(&base_url)?,
            form_definition_path: normalize_path(&form_definition_path),
            timeout: Duration::from_secs(timeout_secs.max(1)),
        })
    }

    /// Replaces the form definition path, which may carry a query string.
    #[must_use]
    pub fn with_form_definition_path(mut self, path: &str) -> Self {
        self.form_definition_path = normalize_path(path);
        self
    }

    /// Replaces the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the URL the form definition is fetched from.
    #[must_use]
    pub fn form_definition_url(&self) -> String {
        format!("{}{}", self.base(), self.form_definition_path)
    }

    /// Returns the URL submissions are posted to.
    ///
    /// Any query on the definition path is dropped.
    #[must_use]
    pub fn submission_url(&self) -> String {
        let path = self
            .form_definition_path
            .split_once('?')
            .map_or(self.form_definition_path.as_str(), |(path, _)| path);
        format!("{}{}{SUBMIT_SEGMENT}", self.base(), path.trim_end_matches('/'))
    }

    /// Builds the HTTP client shared by the HTTP adapters.
    pub fn build_http_client(&self) -> AppResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(CLIENT_USER_AGENT)
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))
    }

    fn base(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }
}

fn parse_base_url(value: &str) -> AppResult<Url> {
    let url = Url::parse(value.trim()).map_err(|error| {
        AppError::Validation(format!("FORMLOOM_API_BASE_URL '{value}' is not a valid URL: {error}"))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::Validation(format!(
            "FORMLOOM_API_BASE_URL must use http or https, got '{}'",
            url.scheme()
        )));
    }

    Ok(url)
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
