use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::intake::{FormDraft, InputMode};
use crate::prediction::PredictionResult;

/// A prediction ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    #[serde(flatten)]
    pub prediction: PredictionResult,
    /// `"danger"` for fraud, `"safe"` otherwise.
    pub pill: &'static str,
    pub confidence_display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl ResultView {
    pub fn new(prediction: &PredictionResult, completed_at: Option<DateTime<Utc>>) -> Self {
        Self {
            pill: if prediction.is_fraud() { "danger" } else { "safe" },
            confidence_display: prediction.confidence_percent(),
            prediction: prediction.clone(),
            completed_at,
        }
    }
}

/// Snapshot of the form session for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub mode: InputMode,
    pub draft: FormDraft,
    pub can_submit: bool,
    pub loading: bool,
    pub submission_id: Option<Uuid>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub result: Option<ResultView>,
}
