//! Input validation primitives.
//!
//! Provides ergonomic helpers for common validation patterns:
//! - Validating non-empty strings
//! - Validating dotted module names
//! - Validating that a path is an existing directory

use crate::error::{Error, Result};
use std::path::Path;

/// Require a string to be non-empty after trimming.
///
/// Returns a reference to the trimmed string on success.
pub fn require_non_empty<'a>(value: &'a str, field: &str, message: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::validation_invalid_argument(field, message, None, None))
    } else {
        Ok(trimmed)
    }
}

/// Require a dot-separated module name such as `pkg` or `pkg.sub_mod`.
///
/// Each segment must be non-empty, made of ASCII alphanumerics or `_`, and
/// must not start with a digit.
pub fn require_module_name<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    if value.is_empty() {
        return Err(Error::invalid_module_name(field, value, "must not be empty"));
    }

    for segment in value.split('.') {
        if segment.is_empty() {
            return Err(Error::invalid_module_name(
                field,
                value,
                "contains an empty segment",
            ));
        }
        if let Some(bad) = segment
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '_')
        {
            return Err(Error::invalid_module_name(
                field,
                value,
                format!("contains invalid character '{}'", bad),
            ));
        }
        if segment.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(Error::invalid_module_name(
                field,
                value,
                format!("segment '{}' starts with a digit", segment),
            ));
        }
    }

    Ok(value)
}

/// Require a path to be an existing, readable directory.
pub fn require_directory(path: &Path) -> Result<()> {
    let display = path.display().to_string();
    let meta = std::fs::metadata(path)
        .map_err(|e| Error::invalid_root(&display, e.to_string()))?;
    if !meta.is_dir() {
        return Err(Error::invalid_root(&display, "not a directory"));
    }
    std::fs::read_dir(path).map_err(|e| Error::invalid_root(&display, e.to_string()))?;
    Ok(())
}
