// salesflow-core/src/application/preprocess.rs
//
// USE CASE: raw long-format CSV -> processed wide CSV.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::info;

use crate::domain::project::ProjectConfig;
use crate::domain::sales::reshape_sales;
use crate::error::SalesflowError;
use crate::infrastructure::discovery::resolve_input;
use crate::ports::storage::{TableSink, TableSource};

#[derive(Debug, Default, Clone)]
pub struct PreprocessRequest {
    /// Explicit raw file; skips latest-file selection.
    pub input: Option<PathBuf>,
    /// Explicit output file; skips the timestamped naming.
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct PreprocessOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub raw_rows: usize,
    pub rows: usize,
    pub columns: Vec<String>,
}

pub fn processed_file_name(at: NaiveDateTime) -> String {
    format!("sales_processed_{}.csv", at.format("%Y%m%d_%H%M"))
}

pub fn run_preprocess(
    source: &dyn TableSource,
    sink: &dyn TableSink,
    project_dir: &Path,
    config: &ProjectConfig,
    request: PreprocessRequest,
) -> Result<PreprocessOutcome, SalesflowError> {
    info!("=== Preprocessing started ===");

    // 1. Locate input
    let raw_dir = config.resolve(project_dir, &config.raw_dir);
    let input = resolve_input(
        request.input.as_deref(),
        &raw_dir,
        &config.raw_pattern,
        config.raw_fallback.as_deref(),
    )?;
    info!(path = ?input, "Raw input");

    // 2. Transform + validate
    let raw = source.read_table(&input)?;
    let wide = reshape_sales(&raw)?;

    // 3. Persist
    let output = match request.output {
        Some(path) => path,
        None => config
            .resolve(project_dir, &config.processed_dir)
            .join(processed_file_name(Local::now().naive_local())),
    };
    sink.write_wide(&output, &wide)?;

    info!(
        path = ?output,
        rows = wide.n_rows(),
        columns = wide.columns().len(),
        "=== Preprocessing finished ==="
    );

    Ok(PreprocessOutcome {
        input,
        output,
        raw_rows: raw.len(),
        rows: wide.n_rows(),
        columns: wide.columns().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::CsvFiles;
    use anyhow::Result;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_processed_file_name() {
        let at = NaiveDate::from_ymd_opt(2024, 2, 9)
            .and_then(|d| d.and_hms_opt(7, 5, 59))
            .unwrap_or_default();
        assert_eq!(processed_file_name(at), "sales_processed_20240209_0705.csv");
    }

    #[test]
    fn test_latest_raw_to_processed_dir() -> Result<()> {
        let project = tempdir()?;
        let raw_dir = project.path().join("data/raw");
        fs::create_dir_all(&raw_dir)?;
        fs::write(
            raw_dir.join("sales_20240101_1000.csv"),
            "timestamp,model,sales\n2024-01-01 10:00,GPU-A,4\n2024-01-01 10:00,gpu-b,-1\n",
        )?;

        let outcome = run_preprocess(
            &CsvFiles,
            &CsvFiles,
            project.path(),
            &ProjectConfig::default(),
            PreprocessRequest::default(),
        )?;

        assert!(outcome.output.starts_with(project.path().join("data/processed")));
        assert_eq!(outcome.columns, vec!["gpu-a", "gpu-b"]);
        assert_eq!(fs::read_to_string(&outcome.output)?, "gpu-a,gpu-b\n4,0\n");
        Ok(())
    }

    #[test]
    fn test_explicit_paths() -> Result<()> {
        let dir = tempdir()?;
        let input = dir.path().join("export.csv");
        let output = dir.path().join("out/wide.csv");
        fs::write(&input, "model,sales,timestamp\nx,1,2024-01-01\n")?;

        let outcome = run_preprocess(
            &CsvFiles,
            &CsvFiles,
            dir.path(),
            &ProjectConfig::default(),
            PreprocessRequest {
                input: Some(input.clone()),
                output: Some(output.clone()),
            },
        )?;
        assert_eq!(outcome.input, input);
        assert_eq!(fs::read_to_string(output)?, "x\n1\n");
        Ok(())
    }

    #[test]
    fn test_schema_error_writes_nothing() -> Result<()> {
        let dir = tempdir()?;
        let input = dir.path().join("bad.csv");
        let output = dir.path().join("wide.csv");
        fs::write(&input, "when,what\n2024-01-01,x\n")?;

        let res = run_preprocess(
            &CsvFiles,
            &CsvFiles,
            dir.path(),
            &ProjectConfig::default(),
            PreprocessRequest {
                input: Some(input),
                output: Some(output.clone()),
            },
        );
        assert!(matches!(res, Err(SalesflowError::Domain(_))));
        assert!(!output.exists());
        Ok(())
    }

    #[test]
    fn test_missing_raw_dir_is_not_found() -> Result<()> {
        let dir = tempdir()?;
        let res = run_preprocess(
            &CsvFiles,
            &CsvFiles,
            dir.path(),
            &ProjectConfig::default(),
            PreprocessRequest::default(),
        );
        assert!(res.is_err_and(|e| e.is_not_found()));
        Ok(())
    }
}
