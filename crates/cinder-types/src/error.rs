//! Failure taxonomy shared by every engine crate.

use thiserror::Error;

/// Failure kinds an engine operation can surface to callers.
///
/// Store-level errors convert into this taxonomy at the store crate's
/// boundary, so engine code can use `?` on query functions directly.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A referenced entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation already happened or collides with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A debit was requested against a balance that cannot cover it.
    #[error("insufficient coins: need {required}, have {available}")]
    InsufficientFunds { required: i64, available: i64 },

    /// The operation is not valid in the current lifecycle state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Unexpected storage failure.
    #[error("store error: {0}")]
    Store(String),
}

impl EngineError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn conflict(what: impl Into<String>) -> Self {
        Self::Conflict(what.into())
    }

    pub fn invalid_state(what: impl Into<String>) -> Self {
        Self::InvalidState(what.into())
    }
}
