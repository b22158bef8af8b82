use thiserror::Error;

use crate::models::ItemId;
use crate::repository::RepositoryError;

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{context}: {source}")]
    Repository {
        context: &'static str,
        #[source]
        source: RepositoryError,
    },
}

pub type ItemResult<T> = Result<T, ItemError>;

impl ItemError {
    /// Wrap a repository failure with the operation that hit it
    pub fn repository(context: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |source| ItemError::Repository { context, source }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ItemError::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ItemError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_repository_error_keeps_source() {
        let err = ItemError::repository("failed to retrieve items")(RepositoryError::Unavailable(
            "connection refused".to_string(),
        ));

        assert_eq!(
            err.to_string(),
            "failed to retrieve items: storage unavailable: connection refused"
        );
        let source = err.source().and_then(|s| s.downcast_ref::<RepositoryError>());
        assert!(matches!(source, Some(RepositoryError::Unavailable(_))));
        assert!(!err.is_not_found());
        assert!(!err.is_validation());
    }
}
