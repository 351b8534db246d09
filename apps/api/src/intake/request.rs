use serde::{Deserialize, Serialize};

use crate::intake::models::{FormDraft, InputMode};

/// Body of `POST {base_url}/predict`.
///
/// Tri-state fields are always present; `None` goes out as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRequest {
    pub title: String,
    pub company_profile: String,
    pub description: String,
    pub requirements: String,
    pub benefits: String,
    pub salary_range: String,
    pub remote: Option<bool>,
    pub has_company_website: Option<bool>,
}

/// Builds the wire request for the given mode. Every string is trimmed.
///
/// Paragraph mode carries the pasted text in `description` only.
pub fn normalize(mode: InputMode, draft: &FormDraft) -> CanonicalRequest {
    match mode {
        InputMode::Paragraph => CanonicalRequest {
            description: draft.paragraph.trim().to_string(),
            ..Default::default()
        },
        InputMode::Structured => {
            let f = &draft.fields;
            CanonicalRequest {
                title: f.title.trim().to_string(),
                company_profile: f.company_profile.trim().to_string(),
                description: f.description.trim().to_string(),
                requirements: f.requirements.trim().to_string(),
                benefits: f.benefits.trim().to_string(),
                salary_range: f.salary_range.trim().to_string(),
                remote: f.remote.as_option(),
                has_company_website: f.has_company_website.as_option(),
            }
        }
    }
}
