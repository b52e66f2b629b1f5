//! Request payloads accepted by the HTTP layer.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;
use crate::query::QueryError;
use crate::services::ServiceError;

pub mod client;

#[derive(Debug, Error)]
/// Errors that can occur when turning request data into domain values.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Field(#[from] TypeConstraintError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}
