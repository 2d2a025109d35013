use clap::Args;

use import_rewriter::rewrite::{self, RewriteReport, RewriteRule};

use super::{CmdResult, MatchArgs};

#[derive(Args, Debug)]
pub struct RewriteArgs {
    /// Root directory to rewrite
    pub path: String,

    /// Module name to migrate from (e.g. old_pkg)
    pub old: String,

    /// Module name to migrate to (e.g. new_pkg)
    pub new: String,

    #[command(flatten)]
    pub matching: MatchArgs,

    /// Report what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the report as a JSON envelope instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: RewriteArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<RewriteReport> {
    let rule = RewriteRule::new(&args.old, &args.new)?;

    let mut options = args.matching.to_options()?;
    options.dry_run = args.dry_run;

    let root = super::resolve_root(&args.path);
    let report = rewrite::rewrite(&root, &rule, &options)?;

    // Per-file failures are part of the report, not the exit code
    Ok((report, 0))
}
