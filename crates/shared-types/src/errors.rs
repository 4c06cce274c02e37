//! Shared error vocabulary.
//!
//! Every crate defines its own `thiserror` error enum for its own port
//! boundary, but each variant is classified into one of these kinds so the
//! orchestrator's retry policy and the supervisor's shutdown policy can
//! dispatch on a closed, shared taxonomy instead of per-crate special-casing.

use thiserror::Error;

/// The error taxonomy from the error-handling design: validation and conflict
/// errors are surfaced immediately, transient errors are retried locally,
/// fatal errors stop the owning chain loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input; never retried.
    Validation,
    /// Lookup with no matching row.
    NotFound,
    /// Unique-constraint violation / already exists.
    Conflict,
    /// Caller is not allowed to perform the action.
    Unauthorized,
    /// Network/timeout/deadlock; retried up to `MaxRetries`.
    Transient,
    /// Unrecoverable for the owning loop; propagated to the supervisor.
    Fatal,
    /// Log layout did not match the expected event signature.
    ParseError,
}

/// A generic cross-crate error, used where a dedicated per-crate error type
/// would be pure ceremony (chain id parsing, id round-tripping, simple
/// validation gates shared by more than one crate).
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("transient error: {0}")]
    Transient(String),
    #[error("fatal error: {0}")]
    Fatal(String),
    #[error("parse error: {0}")]
    ParseError(String),
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::NotFound(_) => ErrorKind::NotFound,
            CoreError::Conflict(_) => ErrorKind::Conflict,
            CoreError::Unauthorized(_) => ErrorKind::Unauthorized,
            CoreError::Transient(_) => ErrorKind::Transient,
            CoreError::Fatal(_) => ErrorKind::Fatal,
            CoreError::ParseError(_) => ErrorKind::ParseError,
        }
    }
}

/// Implemented by every crate-local error enum so shared retry/propagation
/// logic can inspect the kind without matching on foreign types.
pub trait Classified {
    fn kind(&self) -> ErrorKind;

    fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }

    fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Fatal
    }
}

impl Classified for CoreError {
    fn kind(&self) -> ErrorKind {
        CoreError::kind(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_is_retryable() {
        let e = CoreError::Transient("rpc timeout".into());
        assert!(e.is_retryable());
        assert!(!e.is_fatal());
    }

    #[test]
    fn fatal_is_not_retryable() {
        let e = CoreError::Fatal("reorg too deep".into());
        assert!(e.is_fatal());
        assert!(!e.is_retryable());
    }
}
