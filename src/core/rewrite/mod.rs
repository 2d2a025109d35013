//! Import rewriting: migrate import statements after a module rename.
//!
//! A run is a single synchronous pass:
//! 1. Discover source files under the root (sorted, excluded dirs skipped)
//! 2. Detect import statements that reference the old name and rewrite them
//!    atomically, one file at a time
//! 3. Verify by searching every remaining file for the old name literally
//! 4. Report changed files, files needing manual review, and per-file failures

mod detect;
mod engine;
mod report;
mod rule;
mod walk;

pub use detect::{apply, detect, find_literal, Detector, ImportKind, ImportStatement, LiteralHits};
pub use engine::{rewrite, scan};
pub use report::{
    FailurePhase, FileChange, FileFailure, FileReferences, ResidualReference, RewriteReport,
    ScanReport,
};
pub use rule::{MatchMode, RewriteOptions, RewriteRule};
pub use walk::ExcludeSet;
