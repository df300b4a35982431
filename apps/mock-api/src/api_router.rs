use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use formloom_core::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub const FORM_DEFINITION_PATH: &str = "/api/DynamicForm/get-form-definition";

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            FORM_DEFINITION_PATH,
            get(handlers::form_definitions::get_form_definition_handler),
        )
        .route(
            "/api/DynamicForm/get-form-definition/submit",
            post(handlers::submissions::create_submission_handler),
        )
        .route(
            "/api/DynamicForm/submissions",
            get(handlers::submissions::list_submissions_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}
