// salesflow-core/src/infrastructure/fs.rs
//
// Every artifact (processed CSV, model JSON) is staged next to its target
// and renamed into place.

use crate::infrastructure::error::InfrastructureError;
use std::io::{ErrorKind, Write};
use std::path::Path;

fn staged<C: AsRef<[u8]>>(
    path: &Path,
    content: C,
) -> Result<tempfile::NamedTempFile, InfrastructureError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    // Same directory as the target so the final rename stays on one filesystem
    let mut temp_file = tempfile::NamedTempFile::new_in(parent).map_err(InfrastructureError::Io)?;
    temp_file
        .write_all(content.as_ref())
        .map_err(InfrastructureError::Io)?;
    Ok(temp_file)
}

/// Write content to a file atomically using a temporary file.
///
/// The content goes to a temporary file in the target's directory, which is
/// then renamed over the target. The target is either fully written or left
/// as it was.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    staged(path, content)?
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;
    Ok(())
}

/// Like [`atomic_write`] but never replaces an existing file.
///
/// Returns `Ok(false)` (and writes nothing) when `path` already exists.
pub fn atomic_write_new<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<bool, InfrastructureError> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(false);
    }
    match staged(path, content)?.persist_noclobber(path) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(InfrastructureError::Io(e.error)),
    }
}
