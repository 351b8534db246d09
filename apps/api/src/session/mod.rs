//! The single form session: what the operator has typed, the submission in
//! flight, and the last rendered outcome.
//!
//! At most one submission is pending at a time. Its result replaces the
//! previous one; a reset discards both and cancels anything still in flight.

pub mod handlers;
pub mod view;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::intake::{
    check, normalize, validate, CanonicalRequest, FormDraft, InputMode, JobPostingStructured,
    TriState, ValidationError,
};
use crate::prediction::{PredictError, PredictionResult};
use crate::session::view::{FormView, ResultView};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("A submission is already in progress")]
    Busy,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Partial update of the structured fields; absent keys are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldsPatch {
    pub title: Option<String>,
    pub company_profile: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub salary_range: Option<String>,
    pub remote: Option<TriState>,
    pub has_company_website: Option<TriState>,
}

impl FieldsPatch {
    fn apply(self, fields: &mut JobPostingStructured) {
        let text = [
            (self.title, &mut fields.title),
            (self.company_profile, &mut fields.company_profile),
            (self.description, &mut fields.description),
            (self.requirements, &mut fields.requirements),
            (self.benefits, &mut fields.benefits),
            (self.salary_range, &mut fields.salary_range),
        ];
        for (value, slot) in text {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(remote) = self.remote {
            fields.remote = remote;
        }
        if let Some(website) = self.has_company_website {
            fields.has_company_website = website;
        }
    }
}

/// Everything the caller needs to run one submission outside the session lock.
#[derive(Debug)]
pub struct Submission {
    pub id: Uuid,
    pub request: CanonicalRequest,
    pub cancel: CancellationToken,
}

#[derive(Debug)]
struct Pending {
    id: Uuid,
    started_at: DateTime<Utc>,
    cancel: CancellationToken,
}

#[derive(Debug)]
struct Outcome {
    result: PredictionResult,
    completed_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct FormSession {
    mode: InputMode,
    draft: FormDraft,
    pending: Option<Pending>,
    outcome: Option<Outcome>,
    error: Option<String>,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.outcome.as_ref().map(|o| &o.result)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Switching tabs keeps both drafts but clears whatever was shown.
    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
        self.clear_outcome();
    }

    pub fn set_paragraph(&mut self, text: String) {
        self.draft.paragraph = text;
    }

    pub fn update_fields(&mut self, patch: FieldsPatch) {
        patch.apply(&mut self.draft.fields);
    }

    pub fn can_submit(&self) -> bool {
        !self.is_loading() && validate(self.mode, &self.draft)
    }

    /// Validates the draft and marks a submission as in flight.
    ///
    /// On error nothing changes and no request should be sent.
    pub fn begin_submit(&mut self) -> Result<Submission, SessionError> {
        if self.pending.is_some() {
            return Err(SessionError::Busy);
        }
        check(self.mode, &self.draft)?;

        self.clear_outcome();
        let pending = Pending {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            cancel: CancellationToken::new(),
        };
        let submission = Submission {
            id: pending.id,
            request: normalize(self.mode, &self.draft),
            cancel: pending.cancel.clone(),
        };
        info!("Submission {} started ({:?} mode)", pending.id, self.mode);
        self.pending = Some(pending);
        Ok(submission)
    }

    /// Records the outcome of submission `id`. Returns false, leaving the
    /// session untouched, when `id` is no longer the pending submission.
    pub fn complete(&mut self, id: Uuid, outcome: &Result<PredictionResult, PredictError>) -> bool {
        if self.pending.as_ref().map(|p| p.id) != Some(id) {
            debug!("Discarding stale outcome for submission {id}");
            return false;
        }
        self.pending = None;

        match outcome {
            Ok(result) => {
                info!(
                    "Submission {id} completed: {} ({})",
                    result.label,
                    result.confidence_percent()
                );
                self.outcome = Some(Outcome {
                    result: result.clone(),
                    completed_at: Utc::now(),
                });
            }
            Err(e) => {
                info!("Submission {id} failed: {e}");
                self.error = Some(e.to_string());
            }
        }
        true
    }

    /// Drops submission `id` without recording an outcome and cancels its
    /// request. Returns false when `id` is no longer pending.
    pub fn abandon(&mut self, id: Uuid) -> bool {
        match self.pending.take() {
            Some(pending) if pending.id == id => {
                info!("Submission {id} abandoned before completion");
                pending.cancel.cancel();
                true
            }
            other => {
                self.pending = other;
                false
            }
        }
    }

    /// Back to the initial empty form. Any pending submission is cancelled.
    pub fn reset(&mut self) {
        if let Some(pending) = self.pending.take() {
            info!("Reset cancels pending submission {}", pending.id);
            pending.cancel.cancel();
        }
        self.mode = InputMode::default();
        self.draft = FormDraft::default();
        self.clear_outcome();
    }

    pub fn view(&self) -> FormView {
        FormView {
            mode: self.mode(),
            draft: self.draft().clone(),
            can_submit: self.can_submit(),
            loading: self.is_loading(),
            submission_id: self.pending.as_ref().map(|p| p.id),
            submitted_at: self.pending.as_ref().map(|p| p.started_at),
            error: self.error().map(str::to_string),
            result: self
                .outcome
                .as_ref()
                .map(|o| ResultView::new(&o.result, Some(o.completed_at))),
        }
    }

    fn clear_outcome(&mut self) {
        self.outcome = None;
        self.error = None;
    }
}

/// Releases the session if the submitting task goes away mid-flight.
///
/// Held for the whole prediction call. Dropping it while still armed, for
/// example when the client disconnects and the handler future is dropped,
/// abandons the submission so the form does not stay busy.
pub struct SubmissionGuard {
    form: Arc<Mutex<FormSession>>,
    id: Uuid,
    armed: bool,
}

impl SubmissionGuard {
    pub fn new(form: Arc<Mutex<FormSession>>, submission: &Submission) -> Self {
        Self {
            form,
            id: submission.id,
            armed: true,
        }
    }

    /// Call once the outcome has been recorded.
    pub fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let id = self.id;
        if let Ok(mut form) = self.form.try_lock() {
            form.abandon(id);
            return;
        }
        // Lock is busy; finish the release on the runtime if there is one.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let form = Arc::clone(&self.form);
                handle.spawn(async move {
                    form.lock().await.abandon(id);
                });
            }
            Err(_) => warn!("Submission {id} dropped outside a runtime; session left pending"),
        }
    }
}
