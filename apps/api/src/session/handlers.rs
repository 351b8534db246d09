//! Axum route handlers for the form session.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::intake::InputMode;
use crate::session::view::FormView;
use crate::session::{FieldsPatch, SubmissionGuard};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetModeRequest {
    pub mode: InputMode,
}

#[derive(Debug, Deserialize)]
pub struct SetParagraphRequest {
    pub text: String,
}

/// GET /api/v1/form
pub async fn handle_get_form(State(state): State<AppState>) -> Json<FormView> {
    Json(state.form.lock().await.view())
}

/// PUT /api/v1/form/mode
pub async fn handle_set_mode(
    State(state): State<AppState>,
    Json(req): Json<SetModeRequest>,
) -> Json<FormView> {
    let mut form = state.form.lock().await;
    form.set_mode(req.mode);
    Json(form.view())
}

/// PUT /api/v1/form/paragraph
pub async fn handle_set_paragraph(
    State(state): State<AppState>,
    Json(req): Json<SetParagraphRequest>,
) -> Json<FormView> {
    let mut form = state.form.lock().await;
    form.set_paragraph(req.text);
    Json(form.view())
}

/// PATCH /api/v1/form/fields
pub async fn handle_update_fields(
    State(state): State<AppState>,
    Json(patch): Json<FieldsPatch>,
) -> Json<FormView> {
    let mut form = state.form.lock().await;
    form.update_fields(patch);
    Json(form.view())
}

/// POST /api/v1/form/submit
///
/// Runs the prediction with the session unlocked, so the form stays
/// readable (and resettable) while the call is pending. If this future is
/// dropped before the outcome is recorded, the guard abandons the submission.
pub async fn handle_submit(State(state): State<AppState>) -> Result<Json<FormView>, AppError> {
    let submission = state.form.lock().await.begin_submit()?;
    let mut guard = SubmissionGuard::new(Arc::clone(&state.form), &submission);

    let outcome = state
        .predictor
        .predict(&submission.request, &submission.cancel)
        .await;

    let mut form = state.form.lock().await;
    form.complete(submission.id, &outcome);
    guard.disarm();
    outcome?;
    Ok(Json(form.view()))
}

/// POST /api/v1/form/reset
pub async fn handle_reset(State(state): State<AppState>) -> Json<FormView> {
    let mut form = state.form.lock().await;
    let discarded = form.result().is_some() || form.error().is_some();
    form.reset();
    info!("Form reset (discarded previous outcome: {discarded})");
    Json(form.view())
}
