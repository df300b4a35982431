use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::state::StoredSubmission;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../bindings/health-response.ts")]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Query accepted by the form definition route.
#[derive(Debug, Default, Deserialize)]
pub struct FormDefinitionQuery {
    pub variant: Option<String>,
}

/// Listing entry of a stored submission.
#[derive(Debug, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../../bindings/submission-summary-response.ts")]
pub struct SubmissionSummaryResponse {
    pub id: String,
    pub form_definition_id: String,
    pub form_version: u32,
    pub is_complete: bool,
    pub status: String,
    pub submitted_at: String,
    pub answered_fields: usize,
    pub completion_time: Option<u64>,
    pub device_type: Option<String>,
}

impl From<&StoredSubmission> for SubmissionSummaryResponse {
    fn from(value: &StoredSubmission) -> Self {
        Self {
            id: value.response.id.clone(),
            form_definition_id: value.request.form_definition_id.to_string(),
            form_version: value.request.form_version,
            is_complete: value.request.is_complete,
            status: value.response.status.as_str().to_owned(),
            submitted_at: value.response.submitted_at.to_rfc3339(),
            answered_fields: value.request.data.len(),
            completion_time: value.request.completion_time,
            device_type: value
                .request
                .metadata
                .as_ref()
                .and_then(|metadata| metadata.device_type)
                .map(|device_type| device_type.as_str().to_owned()),
        }
    }
}
