//! Storage error taxonomy.

/// Errors surfaced by storage backends.
///
/// Handlers only ever see this taxonomy; raw transport errors are translated
/// at the backend boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("{entity} not found")]
    NotFound {
        /// Entity name for the response body.
        entity: &'static str,
    },

    /// A uniqueness constraint was violated.
    #[error("conflict: {message}")]
    Conflict {
        /// Description of the conflicting write.
        message: String,
    },

    /// The backend is temporarily unreachable; the caller may retry.
    #[error("store unavailable: {message}")]
    Unavailable {
        /// Description of the outage.
        message: String,
    },

    /// An unexpected backend failure.
    #[error("internal store error: {message}")]
    Internal {
        /// Description of the failure.
        message: String,
    },
}

impl StoreError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    /// Creates a new `Conflict` error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates a new `Unavailable` error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if the record was simply absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if retrying the operation may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Type alias for storage results.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            StoreError::not_found("Cinema").to_string(),
            "Cinema not found"
        );
        assert_eq!(
            StoreError::conflict("duplicate name").to_string(),
            "conflict: duplicate name"
        );
    }

    #[test]
    fn test_error_predicates() {
        assert!(StoreError::not_found("Show").is_not_found());
        assert!(!StoreError::not_found("Show").is_transient());
        assert!(StoreError::unavailable("pool exhausted").is_transient());
    }
}
