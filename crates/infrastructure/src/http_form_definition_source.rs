use async_trait::async_trait;
use formloom_application::FormDefinitionSource;
use formloom_core::{AppError, AppResult};
use formloom_domain::FormDefinitionPayload;
use tracing::debug;

use crate::form_api_config::FormApiConfig;
use crate::http_response::error_for_status;

/// Fetches form definitions from the form backend over HTTP.
pub struct HttpFormDefinitionSource {
    http_client: reqwest::Client,
    url: String,
}

impl HttpFormDefinitionSource {
    /// Creates a source for the definition URL of `config`.
    #[must_use]
    pub fn new(http_client: reqwest::Client, config: &FormApiConfig) -> Self {
        Self {
            http_client,
            url: config.form_definition_url(),
        }
    }

    /// Returns the URL definitions are fetched from.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FormDefinitionSource for HttpFormDefinitionSource {
    async fn fetch_form_definition(&self) -> AppResult<FormDefinitionPayload> {
        debug!(url = %self.url, "fetching form definition");

        let response = self.http_client.get(&self.url).send().await.map_err(|error| {
            AppError::Unavailable(format!("form definition request failed: {error}"))
        })?;
        let response = error_for_status(response).await?;

        response.json::<FormDefinitionPayload>().await.map_err(|error| {
            AppError::Decode(format!("form definition response is not a form: {error}"))
        })
    }
}
