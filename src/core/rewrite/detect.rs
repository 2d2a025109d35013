//! Import detection: find import statements that reference a module name.
//!
//! Detection never touches the filesystem. It produces `ImportStatement`
//! spans which `apply` then uses to rebuild the content.

use regex::Regex;
use serde::Serialize;

use super::rule::{MatchMode, RewriteRule};
use crate::error::{Error, Result};

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    /// `import <module>`
    Import,
    /// `from <module> import ...`
    From,
}

/// A single import statement referencing the old module name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportStatement {
    pub kind: ImportKind,
    /// Full dotted module path as written, e.g. `old_pkg.utils`.
    pub module: String,
    /// Byte offset where the old name starts.
    pub start: usize,
    /// Byte offset just past the old name.
    pub end: usize,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, bytes).
    pub column: usize,
}

// ============================================================================
// Detector
// ============================================================================

/// Compiled matcher for one rule and mode. Build once per run.
#[derive(Debug)]
pub struct Detector {
    pattern: Regex,
    skip_migrated: Option<String>,
}

impl Detector {
    pub fn new(rule: &RewriteRule, mode: MatchMode) -> Result<Self> {
        let name = regex::escape(rule.old());
        // `\b` after the name rejects `pkg` inside `pkg_extra` but accepts `pkg.sub`.
        let tail = r"\b(?P<sub>(?:\.[A-Za-z0-9_]+)*)";
        let source = match mode {
            MatchMode::Anchored => format!(
                r"(?m)^[ \t]*(?P<kw>import|from)[ \t]+(?P<name>{}){}",
                name, tail
            ),
            MatchMode::Anywhere => {
                format!(r"\b(?P<kw>import|from)[ \t]+(?P<name>{}){}", name, tail)
            }
        };

        let pattern = Regex::new(&source).map_err(|e| {
            Error::internal_unexpected(format!("Failed to compile import pattern: {}", e))
        })?;

        let skip_migrated = rule
            .new_extends_old()
            .then(|| rule.new_name().to_string());

        Ok(Self {
            pattern,
            skip_migrated,
        })
    }

    /// Find every import statement in `content` that references the old name.
    pub fn detect(&self, content: &str) -> Vec<ImportStatement> {
        let mut statements = Vec::new();
        let mut line = 1;
        let mut line_start = 0;
        let mut cursor = 0;

        for caps in self.pattern.captures_iter(content) {
            let (Some(kw), Some(name)) = (caps.name("kw"), caps.name("name")) else {
                continue;
            };
            let sub = caps.name("sub").map(|m| m.as_str()).unwrap_or("");
            let module = format!("{}{}", name.as_str(), sub);

            if let Some(new) = &self.skip_migrated {
                if is_already_migrated(&module, new) {
                    continue;
                }
            }

            for (offset, byte) in content.as_bytes()[cursor..name.start()].iter().enumerate() {
                if *byte == b'\n' {
                    line += 1;
                    line_start = cursor + offset + 1;
                }
            }
            cursor = name.start();

            statements.push(ImportStatement {
                kind: if kw.as_str() == "import" {
                    ImportKind::Import
                } else {
                    ImportKind::From
                },
                module,
                start: name.start(),
                end: name.end(),
                line,
                column: name.start() - line_start + 1,
            });
        }

        statements
    }
}

fn is_already_migrated(module: &str, new: &str) -> bool {
    module == new
        || module
            .strip_prefix(new)
            .is_some_and(|rest| rest.starts_with('.'))
}

/// Detect import statements without keeping the compiled detector around.
pub fn detect(content: &str, rule: &RewriteRule, mode: MatchMode) -> Result<Vec<ImportStatement>> {
    Ok(Detector::new(rule, mode)?.detect(content))
}

// ============================================================================
// Rewriting
// ============================================================================

/// Replace the old-name span of each statement with `replacement`.
///
/// Everything outside the spans (keyword, whitespace, `.sub` suffixes, the
/// rest of the line) is preserved byte for byte.
pub fn apply(content: &str, statements: &[ImportStatement], replacement: &str) -> String {
    let mut spans: Vec<(usize, usize)> = statements.iter().map(|s| (s.start, s.end)).collect();

    // Replace from end to start so earlier offsets stay valid
    spans.sort_by(|a, b| b.0.cmp(&a.0));
    spans.dedup();

    let mut new_content = content.to_string();
    for (start, end) in spans {
        new_content.replace_range(start..end, replacement);
    }
    new_content
}

// ============================================================================
// Literal search (verification)
// ============================================================================

/// Literal occurrences of `needle` in `haystack`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiteralHits {
    pub occurrences: usize,
    /// Distinct 1-indexed line numbers, ascending.
    pub lines: Vec<usize>,
}

/// Find every exact occurrence of `needle`, with no boundary detection.
/// Works on raw bytes so binary and non-UTF-8 files can be checked too.
pub fn find_literal(haystack: &[u8], needle: &[u8]) -> LiteralHits {
    let mut hits = LiteralHits::default();
    let n = needle.len();

    if n == 0 || n > haystack.len() {
        return hits;
    }

    let mut line = 1;
    let mut counted_to = 0;
    let mut i = 0;
    while i + n <= haystack.len() {
        if &haystack[i..i + n] == needle {
            line += haystack[counted_to..i].iter().filter(|b| **b == b'\n').count();
            counted_to = i;
            hits.occurrences += 1;
            if hits.lines.last() != Some(&line) {
                hits.lines.push(line);
            }
            i += n;
        } else {
            i += 1;
        }
    }

    hits
}

// ============================================================================
// Tests
// ============================================================================
