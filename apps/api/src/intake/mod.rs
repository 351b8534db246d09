//! Input Collector: turns the operator's form state into one canonical request.
//!
//! Two submission styles feed the same request shape: a pasted paragraph, or
//! discrete structured fields. Nothing here performs I/O.

pub mod models;
pub mod request;
pub mod validation;

pub use models::{FormDraft, InputMode, JobPostingParagraph, JobPostingStructured, TriState};
pub use request::{normalize, CanonicalRequest};
pub use validation::{check, validate, ValidationError};
