// salesflow-core/src/infrastructure/discovery.rs
//
// Input selection: "latest file by modification time" among the files of a
// directory matching a glob. This is an explicit policy: with concurrent
// writers the answer can change between the scan and the read, and nothing
// here locks against that.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use glob::Pattern;
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use crate::infrastructure::error::InfrastructureError;

/// Compiles a filename glob (`*`, `?`, `[0-9]` classes).
pub fn file_pattern(pattern: &str) -> Result<Pattern, InfrastructureError> {
    Pattern::new(pattern)
        .map_err(|e| InfrastructureError::ConfigError(format!("Invalid pattern '{pattern}': {e}")))
}

/// Newest regular file directly inside `dir` whose name matches `pattern`.
///
/// Ties on modification time go to the greatest file name. When nothing
/// matches, `fallback` (a file name inside `dir`) is used if it exists.
#[instrument(skip(fallback))]
pub fn latest_matching(
    dir: &Path,
    pattern: &str,
    fallback: Option<&str>,
) -> Result<PathBuf, InfrastructureError> {
    if !dir.is_dir() {
        return Err(InfrastructureError::InputNotFound(format!(
            "Directory {:?} does not exist",
            dir
        )));
    }

    let matcher = file_pattern(pattern)?;
    let mut best: Option<(SystemTime, String, PathBuf)> = None;

    let walker = WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true);
    for entry in walker.into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if !matcher.matches(&name) {
            continue;
        }
        let modified = entry
            .metadata()
            .ok()
            .and_then(|m| m.modified().ok())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        debug!(file = %name, ?modified, "Candidate input");

        let newer = match &best {
            None => true,
            Some((t, n, _)) => (modified, &name) > (*t, n),
        };
        if newer {
            best = Some((modified, name, entry.path().to_path_buf()));
        }
    }

    if let Some((_, _, path)) = best {
        info!(path = ?path, "Latest input selected");
        return Ok(path);
    }

    if let Some(name) = fallback {
        let candidate = dir.join(name);
        if candidate.is_file() {
            info!(path = ?candidate, "No file matches pattern, using fallback");
            return Ok(candidate);
        }
    }

    Err(InfrastructureError::InputNotFound(format!(
        "No file matching '{}' in {:?}",
        pattern, dir
    )))
}

/// An explicit path bypasses selection; it must exist.
pub fn resolve_input(
    explicit: Option<&Path>,
    dir: &Path,
    pattern: &str,
    fallback: Option<&str>,
) -> Result<PathBuf, InfrastructureError> {
    match explicit {
        Some(path) if path.is_file() => Ok(path.to_path_buf()),
        Some(path) => Err(InfrastructureError::InputNotFound(format!(
            "Input file {:?} does not exist",
            path
        ))),
        None => latest_matching(dir, pattern, fallback),
    }
}
