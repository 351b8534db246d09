//! Axum route handlers for one-shot predictions that bypass the form session.

use axum::{extract::State, Json};
use tokio_util::sync::CancellationToken;

use crate::errors::AppError;
use crate::intake::{check, normalize, FormDraft, InputMode, JobPostingParagraph, JobPostingStructured};
use crate::session::view::ResultView;
use crate::state::AppState;

/// POST /api/v1/predict/paragraph
pub async fn handle_predict_paragraph(
    State(state): State<AppState>,
    Json(posting): Json<JobPostingParagraph>,
) -> Result<Json<ResultView>, AppError> {
    predict_draft(&state, InputMode::Paragraph, &FormDraft::from(posting)).await
}

/// POST /api/v1/predict/structured
pub async fn handle_predict_structured(
    State(state): State<AppState>,
    Json(posting): Json<JobPostingStructured>,
) -> Result<Json<ResultView>, AppError> {
    predict_draft(&state, InputMode::Structured, &FormDraft::from(posting)).await
}

async fn predict_draft(
    state: &AppState,
    mode: InputMode,
    draft: &FormDraft,
) -> Result<Json<ResultView>, AppError> {
    check(mode, draft)?;
    let request = normalize(mode, draft);
    let result = state
        .predictor
        .predict(&request, &CancellationToken::new())
        .await?;
    Ok(Json(ResultView::new(&result, None)))
}
