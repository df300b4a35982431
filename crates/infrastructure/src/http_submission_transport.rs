use async_trait::async_trait;
use formloom_application::SubmissionTransport;
use formloom_core::{AppError, AppResult};
use formloom_domain::CreateSubmissionRequest;
use serde_json::Value;
use tracing::{debug, warn};

use crate::form_api_config::FormApiConfig;
use crate::http_response::error_for_status;

/// Posts submissions to the form backend over HTTP.
pub struct HttpSubmissionTransport {
    http_client: reqwest::Client,
    url: String,
}

impl HttpSubmissionTransport {
    /// Creates a transport for the submission URL of `config`.
    #[must_use]
    pub fn new(http_client: reqwest::Client, config: &FormApiConfig) -> Self {
        Self {
            http_client,
            url: config.submission_url(),
        }
    }

    /// Returns the URL submissions are posted to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SubmissionTransport for HttpSubmissionTransport {
    async fn submit(&self, request: &CreateSubmissionRequest) -> AppResult<Value> {
        debug!(
            url = %self.url,
            form_definition_id = %request.form_definition_id,
            is_complete = request.is_complete,
            "posting form submission"
        );

        let response = self
            .http_client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|error| AppError::Unavailable(format!("submission request failed: {error}")))?;
        let response = error_for_status(response).await?;

        // The backend accepted the submission; its answer is only logged.
        let body = match response.text().await {
            Ok(body) => body,
            Err(error) => {
                warn!(error = %error, "accepted submission response body unavailable");
                return Ok(Value::Null);
            }
        };
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        match serde_json::from_str::<Value>(&body) {
            Ok(value) => Ok(value),
            Err(error) => {
                debug!(error = %error, "submission response is not JSON, keeping it as text");
                Ok(Value::String(body))
            }
        }
    }
}
