//! Integration tests for the `dirscan` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A scratch workspace holding a small tree under `data/`.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let ws = Self { dir };
        ws.file("data/a.txt", "alpha");
        ws.file("data/b.md", "bravo");
        ws.file("data/sub/c.txt", "charlie");
        ws.file("data/sub/deep/d.txt", "delta");
        ws.file("data/.hidden.txt", "secret");
        fs::create_dir_all(ws.path().join("data/empty")).unwrap();
        ws
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn file(&self, rel: &str, contents: &str) {
        let path = self.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("dirscan").unwrap();
        cmd.current_dir(self.path())
            .env_remove("DIRSCAN_CONFIG")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{output:?}");
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn scan_detail_lists_files_within_default_depth() {
    let ws = Workspace::new();
    let out = stdout_of(ws.cmd().args(["scan", "data"]));

    assert!(out.starts_with("PATH"));
    assert!(out.contains("a.txt"));
    assert!(out.contains("sub/c.txt"));
    assert!(out.contains("sub/deep/d.txt"));
    assert!(!out.contains(".hidden.txt"));
    assert!(out.contains("Scan complete: 4 files, 2 folders"));
}

#[test]
fn scan_depth_limits_descent() {
    let ws = Workspace::new();
    let out = stdout_of(ws.cmd().args(["scan", "data", "--depth", "2"]));

    assert!(out.contains("sub/c.txt"));
    assert!(!out.contains("d.txt"));
    assert!(out.contains("Scan complete: 3 files, 1 folders"));
}

#[test]
fn scan_extension_filter_and_hidden() {
    let ws = Workspace::new();
    let out = stdout_of(ws.cmd().args(["scan", "data", "--ext", "txt", "--hidden"]));

    assert!(out.contains(".hidden.txt"));
    assert!(out.contains("a.txt"));
    assert!(!out.contains("b.md"));
}

#[test]
fn scan_tree_view_shows_empty_folders_on_request() {
    let ws = Workspace::new();

    let pruned = stdout_of(ws.cmd().args(["scan", "data", "--view", "tree"]));
    assert!(pruned.contains("└── "));
    assert!(pruned.contains("sub/"));
    assert!(!pruned.contains("empty/"));

    let shown = stdout_of(ws.cmd().args(["scan", "data", "--view", "tree", "--show-empty"]));
    assert!(shown.contains("empty/"));
}

#[test]
fn scan_list_view_sorted_by_name() {
    let ws = Workspace::new();
    let out = stdout_of(ws.cmd().args(["scan", "data", "--view", "list", "--sort", "name"]));

    let names: Vec<&str> = out
        .lines()
        .filter(|l| l.starts_with("file"))
        .map(|l| l.split('|').nth(1).unwrap().trim())
        .collect();
    assert_eq!(names, ["a.txt", "b.md", "c.txt", "d.txt"]);
}

#[test]
fn scan_stats_prints_breakdown() {
    let ws = Workspace::new();
    let out = stdout_of(ws.cmd().args(["scan", "data", "--stats"]));

    assert!(out.contains("Statistics"));
    let txt = out.lines().find(|l| l.starts_with(".txt")).unwrap();
    assert!(txt.split_whitespace().nth(1) == Some("3"));
}

#[test]
fn export_json_contains_files_only() {
    let ws = Workspace::new();
    let out = stdout_of(ws.cmd().args(["export", "data", "--format", "json"]));

    let records: serde_json::Value = serde_json::from_str(&out).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r["kind"] == "file"));
    assert!(records.iter().any(|r| r["name"] == "a.txt" && r["size_bytes"] == 5));
}

#[test]
fn export_csv_to_file() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["export", "data", "-f", "csv", "-o", "out.csv", "--ext", ".md"])
        .assert()
        .success();

    let csv = fs::read_to_string(ws.path().join("out.csv")).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("path,name,kind,size,modified,extension,full_path")
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("b.md,b.md,file,5 B,"));
    assert!(row.contains(",.md,"));
    assert_eq!(lines.next(), None);
}

#[test]
fn export_xlsx_to_file() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["export", "data", "-f", "xlsx", "-o", "out.xlsx"])
        .assert()
        .success();

    let bytes = fs::read(ws.path().join("out.xlsx")).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn export_xlsx_requires_output_file() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["export", "data", "--format", "xlsx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output"));
}

#[test]
fn config_file_supplies_defaults() {
    let ws = Workspace::new();
    ws.file(
        "dirscan.json",
        r#"{"scan": {"max_depth": 1, "extensions": "md"}}"#,
    );

    let out = stdout_of(ws.cmd().args(["scan", "data", "--view", "list"]));
    assert!(out.contains("b.md"));
    assert!(!out.contains("a.txt"));

    // Flags win over the file.
    let out = stdout_of(ws.cmd().args(["scan", "data", "--view", "list", "--ext", "*"]));
    assert!(out.contains("a.txt"));
    assert!(!out.contains("c.txt"));
}

#[test]
fn config_init_then_show() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dirscan.json"));
    assert!(ws.path().join("dirscan.json").is_file());

    ws.cmd()
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let out = stdout_of(ws.cmd().args(["config", "show"]));
    let config: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(config["scan"]["max_depth"], 3);
    assert_eq!(config["export"]["format"], "json");
}

#[test]
fn missing_root_fails() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["scan", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn out_of_range_depth_fails() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["scan", "data", "--depth", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 1 and 50"));
}

#[test]
fn ext_conflicts_with_preset() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["scan", "data", "--ext", "txt", "--preset", "images"])
        .assert()
        .failure();
}
