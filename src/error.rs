//! Error types for document and editor operations.

use thiserror::Error;

/// Failures reported by document-level operations.
///
/// Controller-level operations (cursor movement, typing) clamp instead of
/// failing, so these mostly surface from [`crate::document::Document`] and from
/// collaborator-facing calls such as paste and drop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("offset {offset} is outside the document (length {len})")]
    OutOfRange { offset: usize, len: usize },

    #[error("range start {start} is after its end {end}")]
    InvalidRange { start: usize, end: usize },

    #[error("no document is bound to the editor")]
    NoDocumentBound,

    #[error("payload has neither plain nor rich text")]
    UnsupportedPayload,

    #[error("input method event arrived while another edit was in flight")]
    CompositionConflict,
}

pub type EditResult<T> = Result<T, EditError>;
