use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Directory names or glob patterns skipped at any depth.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    patterns: Vec<String>,
}

impl ExcludeSet {
    pub fn new(patterns: &[String]) -> Self {
        Self {
            patterns: patterns
                .iter()
                .map(|p| p.trim().trim_end_matches('/').to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn is_excluded(&self, dir_name: &str) -> bool {
        self.patterns.iter().any(|pattern| {
            if pattern.contains(&['*', '?', '[', '{'][..]) {
                glob_match::glob_match(pattern, dir_name)
            } else {
                pattern == dir_name
            }
        })
    }
}

/// Files found under a root, in discovery order, plus directories that could not be read.
#[derive(Debug, Default)]
pub struct Discovery {
    pub files: Vec<PathBuf>,
    pub failures: Vec<(PathBuf, Error)>,
}

/// Regular files whose extension equals `extension`.
pub fn source_files(root: &Path, exclude: &ExcludeSet, extension: &str) -> Discovery {
    walk(root, exclude, &|path: &Path| {
        path.extension().and_then(|e| e.to_str()) == Some(extension)
    })
}

/// Every regular file, regardless of extension.
pub fn all_files(root: &Path, exclude: &ExcludeSet) -> Discovery {
    walk(root, exclude, &|_: &Path| true)
}

fn walk(root: &Path, exclude: &ExcludeSet, keep: &dyn Fn(&Path) -> bool) -> Discovery {
    let mut discovery = Discovery::default();
    walk_recursive(root, exclude, keep, &mut discovery);
    discovery
}

fn walk_recursive(
    dir: &Path,
    exclude: &ExcludeSet,
    keep: &dyn Fn(&Path) -> bool,
    discovery: &mut Discovery,
) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            let display = dir.display().to_string();
            discovery
                .failures
                .push((dir.to_path_buf(), Error::file_read(display, e.to_string())));
            return;
        }
    };

    // Sorted so reports list files in a stable order
    let mut entries = readable_entries(dir, entries, &mut discovery.failures);
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        // file_type() does not follow symlinks; linked files and dirs are skipped
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                let display = path.display().to_string();
                discovery
                    .failures
                    .push((path, Error::file_read(display, e.to_string())));
                continue;
            }
        };

        if file_type.is_dir() {
            let name = entry.file_name();
            if exclude.is_excluded(&name.to_string_lossy()) {
                continue;
            }
            walk_recursive(&path, exclude, keep, discovery);
        } else if file_type.is_file() && keep(&path) {
            discovery.files.push(path);
        }
    }
}

/// Entries that could be read; each unreadable one is recorded against `dir`.
fn readable_entries<T>(
    dir: &Path,
    entries: impl IntoIterator<Item = io::Result<T>>,
    failures: &mut Vec<(PathBuf, Error)>,
) -> Vec<T> {
    let mut readable = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => readable.push(entry),
            Err(e) => {
                let display = dir.display().to_string();
                failures.push((dir.to_path_buf(), Error::file_read(display, e.to_string())));
            }
        }
    }
    readable
}

/// Path relative to `root` for display, falling back to the full path.
pub fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x\n").unwrap();
    }

    fn names(discovery: &Discovery, root: &Path) -> Vec<String> {
        discovery.files.iter().map(|f| relative(f, root)).collect()
    }

    #[test]
    fn exclude_set_matches_names_and_globs() {
        let set = ExcludeSet::new(&[
            ".git".to_string(),
            "*.egg-info".to_string(),
            "build/".to_string(),
        ]);
        assert!(set.is_excluded(".git"));
        assert!(set.is_excluded("my_pkg.egg-info"));
        assert!(set.is_excluded("build"));
        assert!(!set.is_excluded("src"));
        assert!(!set.is_excluded(".github"));
    }

    #[test]
    fn source_files_filters_by_extension_in_sorted_order() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.py");
        touch(dir.path(), "a.py");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "pkg/z.py");
        touch(dir.path(), "pkg/mod.pyc");

        let found = source_files(dir.path(), &ExcludeSet::default(), "py");
        let sep = std::path::MAIN_SEPARATOR;
        assert_eq!(
            names(&found, dir.path()),
            vec!["a.py".to_string(), "b.py".to_string(), format!("pkg{}z.py", sep)]
        );
        assert!(found.failures.is_empty());
    }

    #[test]
    fn excluded_dirs_are_skipped_at_any_depth() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "keep.py");
        touch(dir.path(), ".git/hooks/pre.py");
        touch(dir.path(), "pkg/__pycache__/mod.py");
        touch(dir.path(), "pkg/thing.egg-info/info.py");

        let exclude = ExcludeSet::new(&[
            ".git".to_string(),
            "__pycache__".to_string(),
            "*.egg-info".to_string(),
        ]);
        let found = all_files(dir.path(), &exclude);
        assert_eq!(names(&found, dir.path()), vec!["keep.py".to_string()]);
    }

    #[test]
    fn missing_root_is_reported_as_failure() {
        let found = all_files(Path::new("/nonexistent/walk/root"), &ExcludeSet::default());
        assert!(found.files.is_empty());
        assert_eq!(found.failures.len(), 1);
        assert_eq!(found.failures[0].1.code.as_str(), "rewrite.file_read");
    }

    #[test]
    fn unreadable_entries_are_recorded_not_dropped() {
        let mut failures = Vec::new();
        let entries = vec![
            Ok("a.py"),
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "entry denied")),
            Ok("b.py"),
        ];

        let readable = readable_entries(Path::new("pkg"), entries, &mut failures);

        assert_eq!(readable, vec!["a.py", "b.py"]);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, PathBuf::from("pkg"));
        assert_eq!(failures[0].1.code.as_str(), "rewrite.file_read");
        assert_eq!(failures[0].1.detail_error(), Some("entry denied"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_followed() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "real/a.py");
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("real/a.py"), dir.path().join("b.py")).unwrap();

        let found = source_files(dir.path(), &ExcludeSet::default(), "py");
        let sep = std::path::MAIN_SEPARATOR;
        assert_eq!(names(&found, dir.path()), vec![format!("real{}a.py", sep)]);
    }
}
