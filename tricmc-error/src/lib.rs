//! Error types shared across the `tricmc` workspace.
//!
//! Following the error-handling design of this system, two families are distinguished:
//!
//! * [`ValidationError`] — a user-supplied input violates a stated contract (e.g. a zero
//!   number of cell divisions, a negative step size). These are always returned as `Result`
//!   and are expected to be handled by the caller.
//! * [`AssertionError`] — a programming error: a precondition, postcondition or internal
//!   invariant was violated. These are not meant to be recovered from; [`AssertionError::terminate`]
//!   turns one into a panic carrying the diagnostic payload.
//!
//! Crate-specific error kinds with richer diagnostic payloads (e.g. a too-narrow domain or a
//! detected race condition) are defined next to the component that raises them, but follow the
//! same `thiserror`-based shape as the errors here.

use thiserror::Error;

/// A user-supplied input violates a stated contract of the system.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be strictly positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must not be zero")]
    Zero { field: &'static str },

    #[error("{what}: {details}")]
    Invalid { what: &'static str, details: String },
}

impl ValidationError {
    pub fn not_positive(field: &'static str, value: f64) -> Self {
        ValidationError::NotPositive { field, value }
    }

    pub fn zero(field: &'static str) -> Self {
        ValidationError::Zero { field }
    }

    pub fn invalid(what: &'static str, details: impl Into<String>) -> Self {
        ValidationError::Invalid { what, details: details.into() }
    }
}

/// A programming error: a precondition, postcondition or internal invariant was violated.
///
/// These are not user-facing: they signal a bug either in this crate or in a collaborator
/// (a shape or interaction implementation, say) that broke a contract this system relies on.
/// The expected way to consume one is [`AssertionError::terminate`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssertionError {
    #[error("precondition violated: {0}")]
    Precondition(String),

    #[error("postcondition violated: {0}")]
    Postcondition(String),

    #[error("internal assertion failed: {0}")]
    Assertion(String),
}

impl AssertionError {
    pub fn precondition(msg: impl Into<String>) -> Self {
        AssertionError::Precondition(msg.into())
    }

    pub fn postcondition(msg: impl Into<String>) -> Self {
        AssertionError::Postcondition(msg.into())
    }

    pub fn assertion(msg: impl Into<String>) -> Self {
        AssertionError::Assertion(msg.into())
    }

    /// Programmer errors are terminal: this is the only sanctioned way to consume one.
    pub fn terminate(self) -> ! {
        panic!("{}", self)
    }
}
