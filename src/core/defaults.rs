use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;

use crate::error::{Error, Result};
use crate::paths;
use crate::rewrite::MatchMode;

/// Root configuration structure for config.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RewriterConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// All configurable defaults that can be overridden via config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Defaults {
    #[serde(default)]
    pub match_mode: MatchMode,

    /// Directory names (or glob patterns) skipped during discovery and verification.
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,

    /// File extension, without the dot, that identifies candidate source files.
    #[serde(default = "default_source_extension")]
    pub source_extension: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::default(),
            exclude_dirs: default_exclude_dirs(),
            source_extension: default_source_extension(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_exclude_dirs() -> Vec<String> {
    [
        ".git",
        ".hg",
        ".svn",
        "__pycache__",
        ".mypy_cache",
        ".pytest_cache",
        ".ruff_cache",
        ".tox",
        ".nox",
        ".venv",
        "venv",
        "node_modules",
        "build",
        "dist",
        "*.egg-info",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_source_extension() -> String {
    "py".to_string()
}

// =============================================================================
// Loading and saving
// =============================================================================

/// Load defaults, merging file config with built-in defaults.
/// If config.json is missing or invalid, silently returns built-in defaults.
pub fn load_defaults() -> Defaults {
    load_config().defaults
}

/// Load the full config, falling back to defaults on any error.
pub fn load_config() -> RewriterConfig {
    load_config_from_file().unwrap_or_default()
}

/// Attempt to load config from config.json.
pub fn load_config_from_file() -> Result<RewriterConfig> {
    let path = paths::config_json()?;

    if !path.exists() {
        return Err(Error::internal_io(
            "config.json not found",
            Some(format!("read {}", path.display())),
        ));
    }

    let content = crate::io::read_file(&path, &format!("read {}", path.display()))?;

    parse_config(&content, &path.display().to_string())
}

/// Parse and validate config.json content.
pub fn parse_config(content: &str, source: &str) -> Result<RewriterConfig> {
    let config: RewriterConfig =
        serde_json::from_str(content).map_err(|e| Error::config_invalid_json(source, e))?;
    validate_defaults(&config.defaults)?;
    Ok(config)
}

fn validate_defaults(defaults: &Defaults) -> Result<()> {
    let ext = defaults.source_extension.trim();
    if ext.is_empty() || ext.contains('/') || ext.contains('\\') {
        return Err(Error::config_invalid_value(
            "defaults.source_extension",
            Some(defaults.source_extension.clone()),
            "must be a non-empty file extension such as 'py'",
        ));
    }

    if let Some(empty) = defaults.exclude_dirs.iter().find(|d| d.trim().is_empty()) {
        return Err(Error::config_invalid_value(
            "defaults.exclude_dirs",
            Some(empty.clone()),
            "entries must be non-empty directory names or glob patterns",
        ));
    }

    Ok(())
}

/// Save config to config.json (creates if missing).
pub fn save_config(config: &RewriterConfig) -> Result<()> {
    let path = paths::config_json()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("create {}", parent.display())))
        })?;
    }

    let content = serde_json::to_string_pretty(config).map_err(|e| {
        Error::internal_json(e.to_string(), Some("serialize config.json".to_string()))
    })?;

    crate::io::write_file_atomic(&path, &content, &format!("write {}", path.display()))
}

/// Set a value at a JSON pointer (e.g. `/defaults/match_mode`) and return the
/// validated config. Nothing is written.
pub fn with_value(config: &RewriterConfig, pointer: &str, value: Value) -> Result<RewriterConfig> {
    if !pointer.starts_with('/') || pointer == "/" {
        return Err(Error::validation_invalid_argument(
            "pointer",
            format!("JSON pointer must start with '/' and name a key: {}", pointer),
            None,
            None,
        ));
    }

    let mut json = serde_json::to_value(config).map_err(|e| {
        Error::internal_json(e.to_string(), Some("serialize config".to_string()))
    })?;

    let slot = json.pointer_mut(pointer).ok_or_else(|| {
        Error::validation_invalid_argument(
            "pointer",
            format!("Unknown configuration key: {}", pointer),
            None,
            Some(vec![
                "/defaults/match_mode".to_string(),
                "/defaults/exclude_dirs".to_string(),
                "/defaults/source_extension".to_string(),
            ]),
        )
    })?;
    *slot = value;

    let updated: RewriterConfig = serde_json::from_value(json)
        .map_err(|e| Error::validation_invalid_json(e, Some(format!("set {}", pointer))))?;
    validate_defaults(&updated.defaults)?;
    Ok(updated)
}

/// Check if config.json exists
pub fn config_exists() -> bool {
    paths::config_json().map(|p| p.exists()).unwrap_or(false)
}

/// Delete config.json (reset to defaults)
pub fn reset_config() -> Result<bool> {
    let path = paths::config_json()?;

    if path.exists() {
        fs::remove_file(&path).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("delete {}", path.display())))
        })?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Get the path to config.json (for display purposes)
pub fn config_path() -> Result<String> {
    Ok(paths::config_json()?.display().to_string())
}

/// Get built-in defaults (ignoring any file config)
pub fn builtin_defaults() -> Defaults {
    Defaults::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_builtin_defaults() {
        let config = parse_config("{}", "test").unwrap();
        assert_eq!(config.defaults, Defaults::default());
        assert_eq!(config.defaults.match_mode, MatchMode::Anchored);
        assert_eq!(config.defaults.source_extension, "py");
        assert!(config.defaults.exclude_dirs.contains(&".git".to_string()));
        assert!(config.defaults.exclude_dirs.contains(&"__pycache__".to_string()));
    }

    #[test]
    fn partial_defaults_keep_other_builtins() {
        let config = parse_config(r#"{"defaults":{"match_mode":"anywhere"}}"#, "test").unwrap();
        assert_eq!(config.defaults.match_mode, MatchMode::Anywhere);
        assert_eq!(config.defaults.source_extension, "py");
        assert_eq!(config.defaults.exclude_dirs, default_exclude_dirs());
    }

    #[test]
    fn invalid_json_is_config_error() {
        let err = parse_config("{not json", "config.json").unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_json");
    }

    #[test]
    fn unknown_match_mode_is_rejected() {
        let err = parse_config(r#"{"defaults":{"match_mode":"fuzzy"}}"#, "test").unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_json");
    }

    #[test]
    fn empty_extension_is_rejected() {
        let err = parse_config(r#"{"defaults":{"source_extension":""}}"#, "test").unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_value");
    }

    #[test]
    fn with_value_sets_known_key() {
        let config = RewriterConfig::default();
        let updated =
            with_value(&config, "/defaults/source_extension", Value::from("pyi")).unwrap();
        assert_eq!(updated.defaults.source_extension, "pyi");
        assert_eq!(config.defaults.source_extension, "py");
    }

    #[test]
    fn with_value_rejects_unknown_key() {
        let err = with_value(
            &RewriterConfig::default(),
            "/defaults/nope",
            Value::from(true),
        )
        .unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }

    #[test]
    fn with_value_rejects_wrong_type() {
        let err = with_value(
            &RewriterConfig::default(),
            "/defaults/exclude_dirs",
            Value::from("just-a-string"),
        )
        .unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_json");
    }
}
