//! Readiness checks run before anything is sent to the prediction service.

use thiserror::Error;

use crate::intake::models::{FormDraft, InputMode};

/// Paragraph text must be strictly longer than this, after trimming.
pub const MIN_PARAGRAPH_CHARS: usize = 10;
/// Title and description must each be strictly longer than this, after trimming.
pub const MIN_FIELD_CHARS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Job text is too short: enter more than {min} characters")]
    ParagraphTooShort { min: usize },

    #[error("Field '{field}' is too short: enter more than {min} characters")]
    FieldTooShort { field: &'static str, min: usize },
}

fn trimmed_len(s: &str) -> usize {
    s.trim().chars().count()
}

/// Returns the first readiness failure for the given mode, if any.
pub fn check(mode: InputMode, draft: &FormDraft) -> Result<(), ValidationError> {
    match mode {
        InputMode::Paragraph => {
            if trimmed_len(&draft.paragraph) <= MIN_PARAGRAPH_CHARS {
                return Err(ValidationError::ParagraphTooShort {
                    min: MIN_PARAGRAPH_CHARS,
                });
            }
        }
        InputMode::Structured => {
            let required = [
                ("title", &draft.fields.title),
                ("description", &draft.fields.description),
            ];
            for (field, value) in required {
                if trimmed_len(value) <= MIN_FIELD_CHARS {
                    return Err(ValidationError::FieldTooShort {
                        field,
                        min: MIN_FIELD_CHARS,
                    });
                }
            }
        }
    }
    Ok(())
}

/// Whether the draft may be submitted in the given mode.
pub fn validate(mode: InputMode, draft: &FormDraft) -> bool {
    check(mode, draft).is_ok()
}
