pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::prediction::handlers as predict;
use crate::session::handlers as form;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // One-shot predictions
        .route(
            "/api/v1/predict/paragraph",
            post(predict::handle_predict_paragraph),
        )
        .route(
            "/api/v1/predict/structured",
            post(predict::handle_predict_structured),
        )
        // Form session
        .route("/api/v1/form", get(form::handle_get_form))
        .route("/api/v1/form/mode", put(form::handle_set_mode))
        .route("/api/v1/form/paragraph", put(form::handle_set_paragraph))
        .route("/api/v1/form/fields", patch(form::handle_update_fields))
        .route("/api/v1/form/submit", post(form::handle_submit))
        .route("/api/v1/form/reset", post(form::handle_reset))
        .with_state(state)
}
