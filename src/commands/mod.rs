use clap::Args;
use std::path::PathBuf;

use import_rewriter::defaults;
use import_rewriter::rewrite::{MatchMode, RewriteOptions};

pub type CmdResult<T> = import_rewriter::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod config;
pub mod rewrite;
pub mod scan;

/// File selection and matching flags shared by `rewrite` and `scan`.
///
/// Unset flags fall back to config.json, then to built-in defaults.
#[derive(Args, Debug, Default)]
pub struct MatchArgs {
    /// Match mode: anchored, anywhere
    #[arg(long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Directory name or glob to skip; replaces the configured list (repeatable)
    #[arg(long = "exclude", value_name = "DIR")]
    pub exclude: Vec<String>,

    /// Directory name or glob to skip on top of the configured list (repeatable)
    #[arg(long = "also-exclude", value_name = "DIR")]
    pub also_exclude: Vec<String>,

    /// Source file extension, e.g. py
    #[arg(long = "ext", value_name = "EXT")]
    pub extension: Option<String>,
}

impl MatchArgs {
    pub fn to_options(&self) -> import_rewriter::Result<RewriteOptions> {
        self.apply(RewriteOptions::from_defaults(&defaults::load_defaults()))
    }

    fn apply(&self, mut options: RewriteOptions) -> import_rewriter::Result<RewriteOptions> {
        if let Some(mode) = &self.mode {
            options.match_mode = MatchMode::from_str(mode)?;
        }
        if !self.exclude.is_empty() {
            options.exclude_dirs = self.exclude.clone();
        }
        options.exclude_dirs.extend(self.also_exclude.iter().cloned());
        if let Some(ext) = &self.extension {
            options.source_extension = ext.trim_start_matches('.').to_string();
        }
        Ok(options)
    }
}

/// Expand `~` in a user-supplied root path.
pub(crate) fn resolve_root(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

pub(crate) fn run_text(
    command: crate::Commands,
    global: &GlobalArgs,
) -> import_rewriter::Result<(String, i32)> {
    match command {
        crate::Commands::Rewrite(args) => {
            rewrite::run(args, global).map(|(report, code)| (report.render_text(), code))
        }
        crate::Commands::Scan(args) => {
            scan::run(args, global).map(|(report, code)| (report.render_text(), code))
        }
        _ => Err(import_rewriter::Error::validation_invalid_argument(
            "output_mode",
            "Command does not support text output",
            None,
            None,
        )),
    }
}

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (import_rewriter::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Rewrite(args) => dispatch!(args, global, rewrite),
        crate::Commands::Scan(args) => dispatch!(args, global, scan),
        crate::Commands::Config(args) => dispatch!(args, global, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_args_override_defaults() {
        let args = MatchArgs {
            mode: Some("anywhere".to_string()),
            exclude: vec!["vendor".to_string()],
            also_exclude: vec!["third_party".to_string()],
            extension: Some(".pyi".to_string()),
        };
        let options = args.apply(RewriteOptions::default()).unwrap();

        assert_eq!(options.match_mode, MatchMode::Anywhere);
        assert_eq!(options.exclude_dirs, vec!["vendor", "third_party"]);
        assert_eq!(options.source_extension, "pyi");
    }

    #[test]
    fn also_exclude_keeps_configured_list() {
        let args = MatchArgs {
            also_exclude: vec!["migrations".to_string()],
            ..MatchArgs::default()
        };
        let options = args.apply(RewriteOptions::default()).unwrap();

        assert!(options.exclude_dirs.contains(&".git".to_string()));
        assert_eq!(options.exclude_dirs.last().map(String::as_str), Some("migrations"));
        assert_eq!(options.match_mode, MatchMode::Anchored);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let args = MatchArgs {
            mode: Some("sometimes".to_string()),
            ..MatchArgs::default()
        };
        let err = args.apply(RewriteOptions::default()).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }
}
