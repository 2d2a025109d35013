//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Read file contents with standardized error handling.
///
/// Wraps `fs::read_to_string` with consistent `Error::internal_io` formatting.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Write content to file atomically (write to a temp sibling, then rename).
///
/// Readers always see either the old content or the new content, never a
/// partial write. If the target already exists its permissions are copied to
/// the new file. The temp file is removed on failure and the original is left
/// untouched.
pub fn write_file_atomic(path: &Path, content: &str, operation: &str) -> Result<()> {
    let tmp_path = temp_path_for(path).ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some(operation.to_string()),
        )
    })?;

    let result = write_then_rename(path, &tmp_path, content, operation);
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_then_rename(path: &Path, tmp_path: &Path, content: &str, operation: &str) -> Result<()> {
    fs::write(tmp_path, content).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("{} (write temp)", operation)))
    })?;

    if let Ok(meta) = fs::metadata(path) {
        fs::set_permissions(tmp_path, meta.permissions()).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("{} (permissions)", operation)))
        })?;
    }

    fs::rename(tmp_path, path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(format!("{} (rename)", operation))))
}

/// Hidden sibling path used while writing `path`.
fn temp_path_for(path: &Path) -> Option<PathBuf> {
    let parent = path.parent()?;
    let filename = path.file_name()?;
    Some(parent.join(format!(
        ".{}.{}.tmp",
        filename.to_string_lossy(),
        std::process::id()
    )))
}
