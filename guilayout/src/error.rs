//! Layout error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("no layout context is active; call begin_context first")]
    NoContext,

    #[error("getting control {index}'s position in a group with only {count} controls")]
    CursorOverrun { index: usize, count: usize },

    #[error("mismatched layout call: expected {expected}, found {found}")]
    Mismatched {
        expected: &'static str,
        found: &'static str,
    },

    #[error("end called without a matching begin")]
    NoOpenGroup,

    #[error("no control has been laid out yet in the current group")]
    NoPreviousControl,

    #[error("layout handle refers to a released node")]
    StaleHandle,

    #[error("layout handle does not refer to a scroll group")]
    NotAScrollGroup,

    #[error("invalid layout config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type LayoutResult<T> = Result<T, LayoutError>;
