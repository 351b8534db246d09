use serde::{Deserialize, Serialize};

/// Which tab of the form the operator is submitting from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Paragraph,
    Structured,
}

/// A yes/no answer the operator may explicitly leave as unknown.
///
/// On the UI side this travels as the strings `"true"`, `"false"` and
/// `"unknown"`; anything else is rejected when deserializing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriState {
    True,
    False,
    #[default]
    Unknown,
}

impl TriState {
    /// Wire encoding: `Unknown` becomes `null`.
    pub fn as_option(self) -> Option<bool> {
        match self {
            TriState::True => Some(true),
            TriState::False => Some(false),
            TriState::Unknown => None,
        }
    }
}

/// Paragraph mode: the whole posting pasted as free text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPostingParagraph {
    pub text: String,
}

/// Structured mode: the posting broken into discrete attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobPostingStructured {
    pub title: String,
    pub company_profile: String,
    pub description: String,
    pub requirements: String,
    pub benefits: String,
    pub salary_range: String,
    pub remote: TriState,
    pub has_company_website: TriState,
}

/// Everything currently typed into the form, across both tabs.
///
/// Switching tabs keeps both halves; the mode decides which one is read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormDraft {
    pub paragraph: String,
    pub fields: JobPostingStructured,
}

impl From<JobPostingParagraph> for FormDraft {
    fn from(p: JobPostingParagraph) -> Self {
        FormDraft {
            paragraph: p.text,
            fields: JobPostingStructured::default(),
        }
    }
}

impl From<JobPostingStructured> for FormDraft {
    fn from(fields: JobPostingStructured) -> Self {
        FormDraft {
            paragraph: String::new(),
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tristate_maps_to_option() {
        assert_eq!(TriState::True.as_option(), Some(true));
        assert_eq!(TriState::False.as_option(), Some(false));
        assert_eq!(TriState::Unknown.as_option(), None);
    }

    #[test]
    fn test_tristate_parses_ui_sentinels() {
        let t: TriState = serde_json::from_str("\"true\"").unwrap();
        let f: TriState = serde_json::from_str("\"false\"").unwrap();
        let u: TriState = serde_json::from_str("\"unknown\"").unwrap();
        assert_eq!((t, f, u), (TriState::True, TriState::False, TriState::Unknown));
    }

    #[test]
    fn test_tristate_rejects_other_strings() {
        assert!(serde_json::from_str::<TriState>("\"maybe\"").is_err());
        assert!(serde_json::from_str::<TriState>("true").is_err());
    }

    #[test]
    fn test_structured_defaults_missing_fields() {
        let s: JobPostingStructured =
            serde_json::from_str(r#"{"title": "Engineer", "description": "Build things"}"#)
                .unwrap();
        assert_eq!(s.benefits, "");
        assert_eq!(s.remote, TriState::Unknown);
        assert_eq!(s.has_company_website, TriState::Unknown);
    }

    #[test]
    fn test_mode_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&InputMode::Structured).unwrap(),
            "\"structured\""
        );
    }
}
