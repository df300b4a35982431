use formloom_core::{AppError, AppResult};

const MAX_ERROR_BODY_CHARS: usize = 512;

/// Turns non-2xx responses into `AppError::UpstreamStatus`.
pub(crate) async fn error_for_status(response: reqwest::Response) -> AppResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<response body unavailable>".to_owned());

    Err(AppError::UpstreamStatus {
        status: status.as_u16(),
        message: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    })
}
