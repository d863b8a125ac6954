// salesflow-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Schema mismatch: expected columns [{expected}], found [{found}]")]
    #[diagnostic(
        code(salesflow::domain::schema),
        help("Raw sales files must have exactly the header 'timestamp,model,sales' (any order).")
    )]
    SchemaMismatch { expected: String, found: String },

    #[error("Invalid dataset: {0}")]
    #[diagnostic(code(salesflow::domain::dataset))]
    InvalidDataset(String),

    #[error("Training failed: {0}")]
    #[diagnostic(code(salesflow::domain::training))]
    Training(String),
}
