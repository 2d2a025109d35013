use sha2::{Digest, Sha256};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::detect::{self, Detector};
use super::report::{
    process_verb, FailurePhase, FileChange, FileFailure, FileReferences, ResidualReference,
    RewriteReport, ScanReport,
};
use super::rule::{RewriteOptions, RewriteRule};
use super::walk::{self, Discovery, ExcludeSet};
use crate::error::{Error, Result};
use crate::io;
use crate::validation;

// ============================================================================
// Rewrite
// ============================================================================

/// Rewrite every recognized import of `rule.old()` under `root`, then report
/// residual references.
///
/// Only an invalid root or extension is fatal, and both are checked before
/// anything is read. Per-file read/write problems land in `report.failures`.
pub fn rewrite(root: &Path, rule: &RewriteRule, options: &RewriteOptions) -> Result<RewriteReport> {
    validation::require_directory(root)?;
    let extension = require_extension(options)?;

    let mut report = RewriteReport {
        root: root.display().to_string(),
        old: rule.old().to_string(),
        new: rule.new_name().to_string(),
        match_mode: options.match_mode,
        dry_run: options.dry_run,
        files_scanned: 0,
        changed: Vec::new(),
        manual_review: Vec::new(),
        failures: Vec::new(),
        total_replacements: 0,
        applied: false,
        noop: rule.is_noop(),
    };

    if report.noop {
        log_status!("rewrite", "Old and new name are both '{}', nothing to do", rule.old());
        return Ok(report);
    }

    let exclude = ExcludeSet::new(&options.exclude_dirs);
    let detector = Detector::new(rule, options.match_mode)?;

    let discovery = walk::source_files(root, &exclude, extension);
    record_discovery_failures(&mut report.failures, root, &discovery);
    report.files_scanned = discovery.files.len();
    log_status!(
        "rewrite",
        "Found {} .{} file(s) under {} ({} mode)",
        report.files_scanned,
        extension,
        root.display(),
        options.match_mode.as_str()
    );

    let verb = process_verb(options.dry_run);

    // Content the verify pass should see instead of disk (dry run only)
    let mut planned: HashMap<PathBuf, String> = HashMap::new();

    for path in &discovery.files {
        let relative = walk::relative(path, root);

        let content = match read_source(path, &relative) {
            Ok(content) => content,
            Err(err) => {
                log_status!("rewrite", "Skipping {}: {}", relative, failure_text(&err));
                report
                    .failures
                    .push(FileFailure::from_error(relative, FailurePhase::Read, &err));
                continue;
            }
        };

        let statements = detector.detect(&content);
        if statements.is_empty() {
            continue;
        }

        let new_content = detect::apply(&content, &statements, rule.new_name());

        if options.dry_run {
            planned.insert(path.clone(), new_content.clone());
        } else if let Err(err) =
            io::write_file_atomic(path, &new_content, &format!("rewrite {}", relative))
        {
            let err = Error::file_write(&relative, failure_text(&err));
            log_status!("rewrite", "Failed to write {}: {}", relative, failure_text(&err));
            report
                .failures
                .push(FileFailure::from_error(relative, FailurePhase::Write, &err));
            continue;
        }

        log_status!("rewrite", "{}: {}", verb, relative);
        report.total_replacements += statements.len();
        report.changed.push(FileChange {
            file: relative,
            replacements: statements.len(),
            sha256_before: sha256_hex(&content),
            sha256_after: sha256_hex(&new_content),
            statements,
        });
    }

    report.applied = !options.dry_run && !report.changed.is_empty();

    // Verification must see the post-rewrite state of every file
    report.manual_review = verify(root, &exclude, rule.old(), &planned, &mut report.failures);

    log_status!(
        "rewrite",
        "{} file(s) rewritten, {} need manual review, {} failed",
        report.changed.len(),
        report.manual_review.len(),
        report.failures.len()
    );

    Ok(report)
}

// ============================================================================
// Scan (read-only)
// ============================================================================

/// Detect imports of `old` and list every file mentioning it, without writing.
pub fn scan(root: &Path, old: &str, options: &RewriteOptions) -> Result<ScanReport> {
    validation::require_directory(root)?;
    let extension = require_extension(options)?;

    // Mapping the name to itself gives a detector with no migration skipping
    let rule = RewriteRule::new(old, old)?;
    let exclude = ExcludeSet::new(&options.exclude_dirs);
    let detector = Detector::new(&rule, options.match_mode)?;

    let mut failures = Vec::new();
    let discovery = walk::source_files(root, &exclude, extension);
    record_discovery_failures(&mut failures, root, &discovery);

    let mut references = Vec::new();
    for path in &discovery.files {
        let relative = walk::relative(path, root);
        match read_source(path, &relative) {
            Ok(content) => {
                let statements = detector.detect(&content);
                if !statements.is_empty() {
                    references.push(FileReferences {
                        file: relative,
                        statements,
                    });
                }
            }
            Err(err) => failures.push(FileFailure::from_error(relative, FailurePhase::Read, &err)),
        }
    }

    let mentions = verify(root, &exclude, old, &HashMap::new(), &mut failures);

    Ok(ScanReport {
        root: root.display().to_string(),
        old: old.to_string(),
        match_mode: options.match_mode,
        files_scanned: discovery.files.len(),
        references,
        mentions,
        failures,
    })
}

// ============================================================================
// Verification
// ============================================================================

/// Literal search for `old` in every non-excluded file under `root`.
fn verify(
    root: &Path,
    exclude: &ExcludeSet,
    old: &str,
    planned: &HashMap<PathBuf, String>,
    failures: &mut Vec<FileFailure>,
) -> Vec<ResidualReference> {
    let discovery = walk::all_files(root, exclude);
    record_discovery_failures(failures, root, &discovery);

    let mut residuals = Vec::new();
    for path in &discovery.files {
        let relative = walk::relative(path, root);

        let bytes: Cow<[u8]> = match planned.get(path) {
            Some(content) => Cow::Borrowed(content.as_bytes()),
            None => match fs::read(path) {
                Ok(bytes) => Cow::Owned(bytes),
                Err(e) => {
                    let err = Error::file_read(&relative, e.to_string());
                    failures.push(FileFailure::from_error(relative, FailurePhase::Verify, &err));
                    continue;
                }
            },
        };

        let hits = detect::find_literal(&bytes, old.as_bytes());
        if hits.occurrences > 0 {
            residuals.push(ResidualReference {
                file: relative,
                occurrences: hits.occurrences,
                lines: hits.lines,
            });
        }
    }

    residuals
}

// ============================================================================
// Helpers
// ============================================================================

fn require_extension(options: &RewriteOptions) -> Result<&str> {
    let ext = validation::require_non_empty(
        &options.source_extension,
        "ext",
        "Source extension cannot be empty",
    )?;
    Ok(ext.trim_start_matches('.'))
}

fn read_source(path: &Path, relative: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::file_read(relative, e.to_string()))
}

/// Unreadable directories, recorded once even though both passes walk the tree.
fn record_discovery_failures(failures: &mut Vec<FileFailure>, root: &Path, discovery: &Discovery) {
    for (path, err) in &discovery.failures {
        let relative = walk::relative(path, root);
        let seen = failures
            .iter()
            .any(|f| f.phase == FailurePhase::Discover && f.file == relative);
        if !seen {
            log_status!("rewrite", "Cannot read directory {}: {}", relative, failure_text(err));
            failures.push(FileFailure::from_error(relative, FailurePhase::Discover, err));
        }
    }
}

fn failure_text(err: &Error) -> String {
    err.detail_error().unwrap_or(&err.message).to_string()
}

fn sha256_hex(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}

// ============================================================================
// Tests
// ============================================================================
