// salesflow-core/src/infrastructure/adapters/mod.rs

pub mod csv_files;
pub mod model_store;

pub use csv_files::CsvFiles;
pub use model_store::{CANONICAL_MODEL_FILE, JsonModelStore};
