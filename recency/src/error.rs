use thiserror::Error;

/// Errors produced when building a cache.
///
/// Every operation on a constructed cache is total: a missing key is a
/// `None` or `false`, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The requested capacity was zero, negative, or too large for `usize`.
    #[error("Cache capacity must be a positive integer, got {requested}")]
    InvalidCapacity {
        /// The capacity as the caller passed it.
        requested: String,
    },
}

/// Shorthand for results whose error is a [`CacheError`].
pub type Result<T, E = CacheError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_capacity_message() {
        let err = CacheError::InvalidCapacity {
            requested: "-1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cache capacity must be a positive integer, got -1"
        );
    }
}
