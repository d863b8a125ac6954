// salesflow-core/src/application/mod.rs

pub mod check;
pub mod preprocess;
pub mod train;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Le CLI fait `use salesflow_core::application::{run_preprocess, run_training};`
// sans connaître la structure interne des fichiers.

pub use check::{CheckReport, CheckSubject, check_model, check_processed, check_raw};
pub use preprocess::{PreprocessOutcome, PreprocessRequest, run_preprocess};
pub use train::{TrainOutcome, TrainRequest, run_training};
