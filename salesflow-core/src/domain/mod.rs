pub mod error;
pub mod project;
pub mod sales;
pub mod table;
pub mod training;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use error::DomainError;
pub use table::Table;
