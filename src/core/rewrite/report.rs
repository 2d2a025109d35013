use serde::Serialize;
use std::fmt::Write as _;

use super::detect::{ImportKind, ImportStatement};
use super::rule::MatchMode;
use crate::error::Error;

/// A source file whose imports were (or, in a dry run, would be) rewritten.
#[derive(Debug, Clone, Serialize)]
pub struct FileChange {
    /// File path relative to root.
    pub file: String,
    /// Number of replacements in this file.
    pub replacements: usize,
    /// Statements found before rewriting.
    pub statements: Vec<ImportStatement>,
    pub sha256_before: String,
    pub sha256_after: String,
}

/// A file that still mentions the old name after the rewrite pass.
#[derive(Debug, Clone, Serialize)]
pub struct ResidualReference {
    /// File path relative to root.
    pub file: String,
    pub occurrences: usize,
    /// 1-indexed lines containing the old name.
    pub lines: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePhase {
    Discover,
    Read,
    Write,
    Verify,
}

impl FailurePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailurePhase::Discover => "discover",
            FailurePhase::Read => "read",
            FailurePhase::Write => "write",
            FailurePhase::Verify => "verify",
        }
    }
}

/// A per-file I/O problem. Recorded, never fatal to the run.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    /// File path relative to root.
    pub file: String,
    pub phase: FailurePhase,
    /// Error code, e.g. `rewrite.file_write`.
    pub code: String,
    pub message: String,
}

impl FileFailure {
    pub fn from_error(file: String, phase: FailurePhase, err: &Error) -> Self {
        Self {
            file,
            phase,
            code: err.code.as_str().to_string(),
            message: err.detail_error().unwrap_or(&err.message).to_string(),
        }
    }
}

/// The full result of one rewrite run.
#[derive(Debug, Clone, Serialize)]
pub struct RewriteReport {
    pub root: String,
    pub old: String,
    pub new: String,
    pub match_mode: MatchMode,
    pub dry_run: bool,
    /// Source files examined during the rewrite pass.
    pub files_scanned: usize,
    /// Files rewritten, in discovery order.
    pub changed: Vec<FileChange>,
    /// Files with residual references, in discovery order.
    pub manual_review: Vec<ResidualReference>,
    pub failures: Vec<FileFailure>,
    pub total_replacements: usize,
    /// Whether changes were written to disk.
    pub applied: bool,
    /// Old and new names are identical; nothing was scanned or verified.
    pub noop: bool,
}

impl RewriteReport {
    pub fn changed_files(&self) -> Vec<&str> {
        self.changed.iter().map(|c| c.file.as_str()).collect()
    }

    pub fn review_files(&self) -> Vec<&str> {
        self.manual_review.iter().map(|r| r.file.as_str()).collect()
    }

    /// Line-oriented report: processed files, failures, then the manual review list.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        if self.noop {
            let _ = writeln!(
                out,
                "old and new names are both '{}'; nothing to do",
                self.old
            );
            return out;
        }

        let verb = process_verb(self.dry_run);

        for change in &self.changed {
            let _ = writeln!(out, "{}: {}", verb, change.file);
        }

        for failure in &self.failures {
            let _ = writeln!(
                out,
                "failed: {} ({}): {}",
                failure.file,
                failure.phase.as_str(),
                failure.message
            );
        }

        if self.manual_review.is_empty() {
            let _ = writeln!(out, "no remaining references to '{}'", self.old);
        } else {
            let _ = writeln!(out, "needs manual review:");
            for residual in &self.manual_review {
                let _ = writeln!(out, "  {} ({})", residual.file, format_lines(&residual.lines));
            }
        }

        out
    }
}

/// Import statements found in one source file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReferences {
    /// File path relative to root.
    pub file: String,
    pub statements: Vec<ImportStatement>,
}

/// Read-only view of where a module name is imported and mentioned.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub root: String,
    pub old: String,
    pub match_mode: MatchMode,
    pub files_scanned: usize,
    /// Rewritable import statements, per source file.
    pub references: Vec<FileReferences>,
    /// Every file containing the name literally, imports included.
    pub mentions: Vec<ResidualReference>,
    pub failures: Vec<FileFailure>,
}

impl ScanReport {
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        for refs in &self.references {
            for statement in &refs.statements {
                let keyword = match statement.kind {
                    ImportKind::Import => "import",
                    ImportKind::From => "from",
                };
                let _ = writeln!(
                    out,
                    "{}:{}:{}: {} {}",
                    refs.file, statement.line, statement.column, keyword, statement.module
                );
            }
        }

        for failure in &self.failures {
            let _ = writeln!(
                out,
                "failed: {} ({}): {}",
                failure.file,
                failure.phase.as_str(),
                failure.message
            );
        }

        if self.mentions.is_empty() {
            let _ = writeln!(out, "no references to '{}'", self.old);
        } else {
            let _ = writeln!(out, "mentioned in:");
            for mention in &self.mentions {
                let _ = writeln!(out, "  {} ({})", mention.file, format_lines(&mention.lines));
            }
        }

        out
    }
}

/// Status word for a rewritten file, shared by the live log and the report.
pub(super) fn process_verb(dry_run: bool) -> &'static str {
    if dry_run {
        "would process"
    } else {
        "processing"
    }
}

fn format_lines(lines: &[usize]) -> String {
    let joined = lines
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if lines.len() == 1 {
        format!("line {}", joined)
    } else {
        format!("lines {}", joined)
    }
}
