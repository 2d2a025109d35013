use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(config_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_import-rewriter"))
        .args(args)
        .env("IMPORT_REWRITER_CONFIG_DIR", config_dir)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn rewrite_prints_processed_files_and_review_list() {
    let config = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.py"), "import old_pkg\n").unwrap();
    fs::write(dir.path().join("c.txt"), "old_pkg is great\n").unwrap();
    let root = dir.path().to_str().unwrap();

    let output = run(config.path(), &["rewrite", root, "old_pkg", "new_pkg"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout(&output),
        "processing: a.py\nneeds manual review:\n  c.txt (line 1)\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("a.py")).unwrap(),
        "import new_pkg\n"
    );
}

#[test]
fn invalid_module_name_exits_2_and_writes_nothing() {
    let config = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.py"), "import old_pkg\n").unwrap();
    let root = dir.path().to_str().unwrap();

    let output = run(config.path(), &["rewrite", root, "old_pkg", "new-pkg"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
    assert_eq!(
        fs::read_to_string(dir.path().join("a.py")).unwrap(),
        "import old_pkg\n"
    );
}

#[test]
fn json_envelope_reports_missing_root() {
    let config = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing");

    let output = run(
        config.path(),
        &["scan", missing.to_str().unwrap(), "old_pkg", "--json"],
    );

    assert_eq!(output.status.code(), Some(2));
    let body: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "rewrite.invalid_root");
}

#[test]
fn config_set_changes_default_match_mode() {
    let config = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("m.py"),
        "x = load(\"from old_thing import y\")\n",
    )
    .unwrap();
    let root = dir.path().to_str().unwrap();

    let output = run(
        config.path(),
        &["config", "set", "/defaults/match_mode", "anywhere"],
    );
    assert_eq!(output.status.code(), Some(0));
    assert!(config.path().join("config.json").exists());

    let output = run(config.path(), &["rewrite", root, "old_thing", "new_thing"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        fs::read_to_string(dir.path().join("m.py")).unwrap(),
        "x = load(\"from new_thing import y\")\n"
    );

    let output = run(config.path(), &["config", "set", "/defaults/match_mode", "fuzzy"]);
    assert_eq!(output.status.code(), Some(2));
}
