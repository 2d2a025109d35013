use serde::{Deserialize, Serialize};

use crate::defaults::Defaults;
use crate::error::{Error, Result};
use crate::validation;

/// Where an import keyword may appear to count as a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Only lines whose first non-whitespace token is `import` or `from`.
    #[default]
    Anchored,
    /// Any `import <old>` / `from <old>` in the content, strings and comments included.
    Anywhere,
}

impl MatchMode {
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "anchored" => Ok(MatchMode::Anchored),
            "anywhere" => Ok(MatchMode::Anywhere),
            _ => Err(Error::validation_invalid_argument(
                "mode",
                format!("Unknown match mode '{}'. Use: anchored, anywhere", s),
                None,
                Some(vec!["anchored".to_string(), "anywhere".to_string()]),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Anchored => "anchored",
            MatchMode::Anywhere => "anywhere",
        }
    }
}

/// Old and new module names for one run. Both names are validated on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteRule {
    old: String,
    new: String,
}

impl RewriteRule {
    pub fn new(old: &str, new: &str) -> Result<Self> {
        validation::require_module_name(old, "old")?;
        validation::require_module_name(new, "new")?;
        Ok(Self {
            old: old.to_string(),
            new: new.to_string(),
        })
    }

    pub fn old(&self) -> &str {
        &self.old
    }

    pub fn new_name(&self) -> &str {
        &self.new
    }

    /// Old and new are the same name; the run changes nothing.
    pub fn is_noop(&self) -> bool {
        self.old == self.new
    }

    /// New name is the old name plus more dotted segments (`pkg` -> `pkg.core`).
    ///
    /// Occurrences that already read as the new name must then be skipped,
    /// otherwise every rerun would append another segment.
    pub fn new_extends_old(&self) -> bool {
        self.new.len() > self.old.len()
            && self.new.starts_with(&self.old)
            && self.new.as_bytes()[self.old.len()] == b'.'
    }
}

/// Run-wide settings. Built from config defaults, then overridden by CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteOptions {
    pub match_mode: MatchMode,
    pub exclude_dirs: Vec<String>,
    pub source_extension: String,
    pub dry_run: bool,
}

impl RewriteOptions {
    pub fn from_defaults(defaults: &Defaults) -> Self {
        Self {
            match_mode: defaults.match_mode,
            exclude_dirs: defaults.exclude_dirs.clone(),
            source_extension: defaults
                .source_extension
                .trim_start_matches('.')
                .to_string(),
            dry_run: false,
        }
    }
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self::from_defaults(&Defaults::default())
    }
}
