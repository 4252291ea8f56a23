//! Error types and result aliases for Atlas.
//!
//! Every engine failure maps to one of a small set of status kinds that the
//! surrounding transport layer translates into wire status codes. Errors are
//! returned synchronously to the immediate caller; nothing here is retried.

/// The result type used throughout Atlas.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in registry operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request was malformed: bad resource name, bad filter, bad page
    /// token, negative page size, missing body, or unknown mask field.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of what made the request invalid.
        message: String,
    },

    /// The named resource (or a required concrete parent) does not exist.
    #[error("not found: {message}")]
    NotFound {
        /// Description of what was looked up.
        message: String,
    },

    /// A resource with the same name already exists (case-insensitively).
    #[error("already exists: {message}")]
    AlreadyExists {
        /// Description of the conflicting name.
        message: String,
    },

    /// A concurrent write won the race; the caller may retry.
    #[error("aborted: {message}")]
    Aborted {
        /// Description of the lost conditional write.
        message: String,
    },

    /// A stored record could not be encoded or decoded.
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of the serialization failure.
        message: String,
    },

    /// An internal invariant was violated.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl Error {
    /// Creates an `InvalidArgument` error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a `NotFound` error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates an `AlreadyExists` error.
    #[must_use]
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::AlreadyExists {
            message: message.into(),
        }
    }

    /// Creates an `Aborted` error.
    #[must_use]
    pub fn aborted(message: impl Into<String>) -> Self {
        Self::Aborted {
            message: message.into(),
        }
    }

    /// Creates an `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Stable machine-readable code for this error kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::AlreadyExists { .. } => "ALREADY_EXISTS",
            Self::Aborted { .. } => "ABORTED",
            Self::Serialization { .. } => "SERIALIZATION",
            Self::Internal { .. } => "INTERNAL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(Error::invalid_argument("x").code(), "INVALID_ARGUMENT");
        assert_eq!(Error::not_found("x").code(), "NOT_FOUND");
        assert_eq!(Error::already_exists("x").code(), "ALREADY_EXISTS");
        assert_eq!(Error::aborted("x").code(), "ABORTED");
    }

    #[test]
    fn display_includes_message() {
        let err = Error::not_found("projects/p");
        assert_eq!(err.to_string(), "not found: projects/p");
    }
}
