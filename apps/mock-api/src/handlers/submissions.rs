use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;
use formloom_core::AppError;
use formloom_domain::{CreateSubmissionRequest, SubmissionResponse, SubmissionStatus};
use tracing::info;
use uuid::Uuid;

use crate::dto::SubmissionSummaryResponse;
use crate::error::ApiResult;
use crate::state::{AppState, StoredSubmission};

pub async fn create_submission_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateSubmissionRequest>,
) -> ApiResult<(StatusCode, Json<SubmissionResponse>)> {
    if payload.form_version == 0 {
        return Err(AppError::Validation("formVersion must be at least 1".to_owned()).into());
    }
    if payload.is_complete && payload.data.is_empty() {
        return Err(
            AppError::Validation("complete submissions must carry data".to_owned()).into(),
        );
    }

    state.simulate_latency().await;

    let (status, message) = if payload.is_complete {
        (SubmissionStatus::Submitted, "Form submitted successfully")
    } else {
        (SubmissionStatus::Draft, "Draft saved")
    };
    let response = SubmissionResponse {
        id: Uuid::new_v4().to_string(),
        form_definition_id: payload.form_definition_id.clone(),
        submitted_at: Utc::now(),
        status,
        message: message.to_owned(),
    };

    info!(
        submission_id = %response.id,
        form_definition_id = %payload.form_definition_id,
        form_version = payload.form_version,
        is_complete = payload.is_complete,
        answered_fields = payload.data.len(),
        "submission stored"
    );

    state
        .record_submission(StoredSubmission {
            request: payload,
            response: response.clone(),
        })
        .await;

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn list_submissions_handler(
    State(state): State<AppState>,
) -> Json<Vec<SubmissionSummaryResponse>> {
    let submissions = state
        .submissions
        .read()
        .await
        .iter()
        .map(SubmissionSummaryResponse::from)
        .collect();
    Json(submissions)
}
