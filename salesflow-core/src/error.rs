// salesflow-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SalesflowError {
    // --- ERREURS DU DOMAINE (Schema, Dataset, Training) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- ERREURS D'INFRASTRUCTURE (IO, Parsing) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- ERREURS GÉNÉRIQUES / APPLICATIVES ---
    #[error("Internal Error: {0}")]
    InternalError(String),
}

impl SalesflowError {
    /// True when the run failed because its input file could not be located.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SalesflowError::Infrastructure(InfrastructureError::InputNotFound(_))
        )
    }
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for SalesflowError {
    fn from(err: std::io::Error) -> Self {
        SalesflowError::Infrastructure(InfrastructureError::Io(err))
    }
}
