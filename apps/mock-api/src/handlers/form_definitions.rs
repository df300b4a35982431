use std::str::FromStr;

use axum::Json;
use axum::extract::{Query, State};
use formloom_core::AppError;
use formloom_infrastructure::SampleForm;
use serde_json::Value;
use tracing::info;

use crate::dto::FormDefinitionQuery;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn get_form_definition_handler(
    State(state): State<AppState>,
    Query(query): Query<FormDefinitionQuery>,
) -> ApiResult<Json<Value>> {
    let sample = match query.variant.as_deref().map(str::trim) {
        Some(variant) if !variant.is_empty() => SampleForm::from_str(variant)?,
        _ => SampleForm::default(),
    };

    state.simulate_latency().await;

    let document = serde_json::from_str::<Value>(sample.json()).map_err(|error| {
        AppError::Internal(format!("sample form '{sample}' is not valid JSON: {error}"))
    })?;
    info!(variant = %sample, "serving form definition");

    Ok(Json(document))
}
