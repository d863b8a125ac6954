// salesflow-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(salesflow::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    #[error("Input not found: {0}")]
    #[diagnostic(
        code(salesflow::infra::input_not_found),
        help("Pass an explicit path or check the directory and file naming convention.")
    )]
    InputNotFound(String),

    // --- CSV ---
    #[error("CSV Error: {0}")]
    #[diagnostic(
        code(salesflow::infra::csv),
        help("Check the delimiter, header row and quoting of the file.")
    )]
    Csv(#[from] csv::Error),

    // --- MODEL ARTIFACTS ---
    #[error("JSON Error: {0}")]
    #[diagnostic(code(salesflow::infra::json))]
    Json(#[from] serde_json::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(salesflow::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(salesflow::infra::config))]
    ConfigError(String),
}
