use thiserror::Error;

use crate::domain::cart::CartIssue;
use crate::domain::order::InvalidTransition;
use crate::repository::RepositoryError;

pub mod cart;
pub mod catalog;
pub mod orders;
pub mod reports;
pub mod settings;
pub mod shipping;
pub mod stock;

/// Typed failures surfaced by the service layer.
///
/// Validation problems, conflicts and operational errors are separate
/// variants so handlers can branch without matching on message text.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    /// Requested order-status move is not an edge of the transition table.
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
    /// User-correctable input problem.
    #[error("validation failed: {0}")]
    Form(String),
    /// Structured pre-checkout findings for the storefront.
    #[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Cart(Vec<CartIssue>),
    #[error("{0}")]
    Conflict(String),
    /// Operational failure below the service layer.
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Conflict(message) => ServiceError::Conflict(message),
            other => ServiceError::Repository(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
