use clap::Args;

use import_rewriter::rewrite::{self, ScanReport};

use super::{CmdResult, MatchArgs};

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Root directory to scan
    pub path: String,

    /// Module name to look for (e.g. old_pkg)
    pub name: String,

    #[command(flatten)]
    pub matching: MatchArgs,

    /// Print the report as a JSON envelope instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ScanArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ScanReport> {
    let options = args.matching.to_options()?;
    let root = super::resolve_root(&args.path);
    let report = rewrite::scan(&root, &args.name, &options)?;
    Ok((report, 0))
}
