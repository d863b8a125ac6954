// salesflow-core/src/application/check.rs
//
// Lightweight data-quality gates over the artifacts of each stage.
// A failed gate is a report, not an error: errors mean the artifact is missing
// or unreadable.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::domain::project::ProjectConfig;
use crate::domain::sales::RAW_COLUMNS;
use crate::domain::table::Table;
use crate::error::SalesflowError;
use crate::infrastructure::discovery::resolve_input;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::storage::{ModelStore, TableSource};

const MAX_FINDINGS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckSubject {
    Raw,
    Processed,
    Model,
}

impl std::fmt::Display for CheckSubject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckSubject::Raw => write!(f, "raw"),
            CheckSubject::Processed => write!(f, "processed"),
            CheckSubject::Model => write!(f, "model"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckReport {
    pub subject: CheckSubject,
    pub path: PathBuf,
    pub findings: Vec<String>,
}

impl CheckReport {
    fn new(subject: CheckSubject, path: PathBuf) -> Self {
        Self {
            subject,
            path,
            findings: Vec::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.findings.is_empty()
    }

    fn finish(mut self, truncated: usize) -> Self {
        if truncated > 0 {
            self.findings.push(format!("... and {truncated} more"));
        }
        if self.passed() {
            info!(subject = %self.subject, path = ?self.path, "Check passed");
        } else {
            warn!(
                subject = %self.subject,
                path = ?self.path,
                findings = self.findings.len(),
                "Check failed"
            );
        }
        self
    }
}

/// Small collector that stops recording after `MAX_FINDINGS` entries.
#[derive(Default)]
struct Findings {
    items: Vec<String>,
    dropped: usize,
}

impl Findings {
    fn push(&mut self, finding: String) {
        if self.items.len() < MAX_FINDINGS {
            self.items.push(finding);
        } else {
            self.dropped += 1;
        }
    }
}

fn is_integer_cell(cell: &str) -> bool {
    let cell = cell.trim();
    !cell.is_empty() && cell.parse::<i64>().is_ok()
}

pub fn raw_findings(table: &Table) -> (Vec<String>, usize) {
    let mut out = Findings::default();

    if table.headers.len() != RAW_COLUMNS.len() {
        out.push(format!(
            "expected {} columns, found {}",
            RAW_COLUMNS.len(),
            table.headers.len()
        ));
    }

    match table.column_index("sales") {
        None => out.push("missing 'sales' column".to_string()),
        Some(idx) => {
            for (i, cell) in table.column(idx).enumerate() {
                let line = i + 2;
                let cell = cell.trim();
                // Whole-valued floats such as "3.0" count as integers.
                match cell.parse::<f64>() {
                    _ if cell.is_empty() => out.push(format!("line {line}: empty sales value")),
                    Ok(v) if v.is_finite() && v.fract() == 0.0 => {
                        if v < 0.0 {
                            out.push(format!("line {line}: negative sales '{cell}'"));
                        }
                    }
                    _ => out.push(format!("line {line}: sales '{cell}' is not an integer")),
                }
            }
        }
    }

    (out.items, out.dropped)
}

pub fn processed_findings(table: &Table) -> (Vec<String>, usize) {
    let mut out = Findings::default();

    if table.column_index("timestamp").is_some() {
        out.push("processed table still has a 'timestamp' column".to_string());
    }

    for (r, row) in table.rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if !is_integer_cell(cell) {
                let column = table.headers.get(c).map(String::as_str).unwrap_or("?");
                out.push(format!(
                    "line {}: column '{column}' value '{cell}' is not an integer",
                    r + 2
                ));
            }
        }
    }

    (out.items, out.dropped)
}

pub fn check_raw(
    source: &dyn TableSource,
    project_dir: &Path,
    config: &ProjectConfig,
    input: Option<&Path>,
) -> Result<CheckReport, SalesflowError> {
    let path = resolve_input(
        input,
        &config.resolve(project_dir, &config.raw_dir),
        &config.raw_pattern,
        config.raw_fallback.as_deref(),
    )?;
    let table = source.read_table(&path)?;
    let (findings, dropped) = raw_findings(&table);

    let mut report = CheckReport::new(CheckSubject::Raw, path);
    report.findings = findings;
    Ok(report.finish(dropped))
}

pub fn check_processed(
    source: &dyn TableSource,
    project_dir: &Path,
    config: &ProjectConfig,
    input: Option<&Path>,
) -> Result<CheckReport, SalesflowError> {
    let path = resolve_input(
        input,
        &config.resolve(project_dir, &config.processed_dir),
        &config.processed_pattern,
        None,
    )?;
    let table = source.read_table(&path)?;
    let (findings, dropped) = processed_findings(&table);

    let mut report = CheckReport::new(CheckSubject::Processed, path);
    report.findings = findings;
    Ok(report.finish(dropped))
}

/// The canonical model must exist; if it does not deserialize or its trees
/// are malformed the check fails.
pub fn check_model(store: &dyn ModelStore) -> Result<CheckReport, SalesflowError> {
    let path = store.canonical_path();
    if !path.is_file() {
        return Err(InfrastructureError::InputNotFound(format!(
            "Canonical model {:?} does not exist",
            path
        ))
        .into());
    }

    let mut report = CheckReport::new(CheckSubject::Model, path.clone());
    match store.load(&path) {
        Ok(model) => info!(
            target_column = %model.target,
            features = model.features.len(),
            trees = model.booster.n_trees(),
            "Canonical model loaded"
        ),
        Err(e) => report.findings.push(format!("cannot load model: {e}")),
    }
    Ok(report.finish(0))
}
