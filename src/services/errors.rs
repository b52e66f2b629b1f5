use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::query::QueryError;
use crate::repository::errors::RepositoryError;

/// Closed set of failures a service call can end with.
///
/// Callers map each variant to a distinct response: `Validation` to bad
/// request, `NotFound` to not found, `DuplicateKey` to conflict and `Store` to
/// a server error.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    DuplicateKey(String),

    #[error("Store failure: {0}")]
    Store(RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        if err.is_unique_violation() {
            ServiceError::DuplicateKey(err.to_string())
        } else {
            ServiceError::Store(err)
        }
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl From<QueryError> for ServiceError {
    fn from(err: QueryError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_becomes_duplicate_key() {
        let err = ServiceError::from(RepositoryError::ConstraintViolation(
            "Unique constraint violation: UNIQUE constraint failed: clients.identification"
                .to_string(),
        ));
        assert!(matches!(err, ServiceError::DuplicateKey(_)));
    }

    #[test]
    fn other_repository_errors_stay_store_failures() {
        let err = ServiceError::from(RepositoryError::ConnectionError("timed out".into()));
        assert!(matches!(
            err,
            ServiceError::Store(RepositoryError::ConnectionError(_))
        ));
    }

    #[test]
    fn query_errors_are_validation_errors() {
        let err = ServiceError::from(QueryError::InvalidPage);
        assert!(matches!(err, ServiceError::Validation(ref m) if m.contains("page")));
    }
}
