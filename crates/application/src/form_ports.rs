use async_trait::async_trait;
use formloom_core::AppResult;
use formloom_domain::{CreateSubmissionRequest, FormDefinitionPayload, SubmissionMetadata};
use serde_json::Value;

/// Port delivering the form definition a session should render.
#[async_trait]
pub trait FormDefinitionSource: Send + Sync {
    /// Fetches the current form definition.
    ///
    /// Transport failures must surface as `AppError::Unavailable` and non-2xx
    /// answers as `AppError::UpstreamStatus` so callers can tell them apart.
    async fn fetch_form_definition(&self) -> AppResult<FormDefinitionPayload>;
}

/// Port sending answered forms to a backend.
#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    /// Posts the submission and returns the backend answer untouched.
    async fn submit(&self, request: &CreateSubmissionRequest) -> AppResult<Value>;
}

/// Port describing the device a form is answered on.
pub trait DeviceMetadataProvider: Send + Sync {
    /// Returns device metadata for a new submission.
    fn metadata(&self) -> SubmissionMetadata;
}
