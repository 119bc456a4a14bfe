use crate::movie_id::MovieId;
use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors returned by every [`MoviesStore`](crate::MoviesStore) backend.
///
/// `NotFound` and `DuplicateKey` are contract errors the caller is expected
/// to act on. The remaining variants describe backend failures and are
/// returned unchanged; stores never retry them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(MovieId),
    #[error("duplicate movie id: {0}")]
    DuplicateKey(MovieId),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

impl StoreError {
    /// Connectivity and deadline failures. The caller may retry these; the
    /// store itself never does.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Timeout(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid movie id: {0}")]
    InvalidMovieId(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors() {
        assert!(StoreError::Unavailable("conn refused".into()).is_transient());
        assert!(StoreError::Timeout("get_all".into()).is_transient());
        assert!(!StoreError::Query("syntax".into()).is_transient());
        assert!(!StoreError::NotFound(MovieId::nil()).is_transient());
    }

    #[test]
    fn display_includes_id() {
        let id: MovieId = "11111111-1111-1111-1111-111111111111".parse().unwrap();
        assert_eq!(
            StoreError::DuplicateKey(id).to_string(),
            "duplicate movie id: 11111111-1111-1111-1111-111111111111"
        );
    }
}
