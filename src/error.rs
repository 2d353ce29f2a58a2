//! Error type shared by the composition and traversal engines.
//!
//! User functions may fail with any error type; the engines propagate it
//! untouched. [`Error`] covers the failures the library itself reports
//! (construction errors, closed streams) and doubles as a convenient default
//! error type for user code that does not need a richer one.

use thiserror::Error;

/// Result type alias for fallible constructors in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by `flowless`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A constructor was given an argument it cannot work with.
    ///
    /// Reported synchronously, never deferred.
    #[error("invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        argument: &'static str,
        /// Why the argument was rejected.
        reason: String,
    },

    /// A chunk was written to a push stream nobody reads anymore.
    #[error("push stream is closed")]
    StreamClosed,

    /// A user function failed.
    #[error("{0}")]
    Failed(String),
}

impl Error {
    /// Creates an [`Error::InvalidArgument`].
    pub fn invalid_argument(argument: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::Failed`] from any message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}
