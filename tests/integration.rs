//! Integration tests for the dirtree binary


use assert_cmd::Command;
use harness::{TestTree, lines, run_dirtree};
use predicates::prelude::*;

fn dirtree() -> Command {
    Command::cargo_bin("dirtree").expect("dirtree binary")
}

#[test]
fn test_basic_listing() {
    let tree = TestTree::new();
    tree.add_file("main.rs", "fn main() {}");
    tree.add_file("src/lib.rs", "pub mod foo;");

    let (stdout, _stderr, success) = run_dirtree(tree.path(), &["-m", "kind"]);
    assert!(success, "dirtree should succeed");
    assert_eq!(lines(&stdout), ["d .", "f main.rs", "d src", "f src/lib.rs"]);
}

#[test]
fn test_default_mode_is_all_fields() {
    let tree = TestTree::new();
    tree.add_file("file1", "dummy content");

    let (stdout, _stderr, success) = run_dirtree(tree.path(), &[]);
    assert!(success);
    let listing = lines(&stdout);
    assert_eq!(listing.len(), 2);
    assert!(listing[0].starts_with("d            crc=n/a      sym=0 perm="));
    assert!(listing[1].starts_with("f 13b        crc=0451ac5e sym=0 perm="));
    assert!(listing[1].ends_with(" file1"));
}

#[test]
fn test_mode_field_list() {
    let tree = TestTree::new();
    tree.add_file("file1", "dummy content");

    let (stdout, _stderr, success) = run_dirtree(tree.path(), &["-m", "kind,size,checksum"]);
    assert!(success);
    assert_eq!(
        lines(&stdout),
        ["d            crc=n/a      .", "f 13b        crc=0451ac5e file1"]
    );

    let (stdout, _stderr, success) = run_dirtree(tree.path(), &["--mode", "default"]);
    assert!(success);
    assert_eq!(lines(&stdout), ["d            .", "f 13b        file1"]);
}

#[test]
fn test_explicit_path_argument() {
    let tree = TestTree::new();
    tree.add_file("inner/file", "x");

    dirtree()
        .args(["-m", "kind", "--exclude-root"])
        .arg(tree.join("inner"))
        .assert()
        .success()
        .stdout("f file\n");
}

#[test]
fn test_level_flag() {
    let tree = TestTree::new();
    tree.add_file("a/b/c/deep.txt", "x");

    let (stdout, _stderr, success) = run_dirtree(tree.path(), &["-m", "kind", "-L", "2"]);
    assert!(success);
    assert_eq!(lines(&stdout), ["d .", "d a", "d a/b"]);

    // 0 means unlimited
    let (stdout, _stderr, success) = run_dirtree(tree.path(), &["-m", "kind", "-L", "0"]);
    assert!(success);
    assert_eq!(lines(&stdout).len(), 5);
}

#[test]
fn test_ignore_and_match_flags() {
    let tree = TestTree::new();
    tree.add_file("src/main.rs", "x");
    tree.add_file("src/debug.log", "x");
    tree.add_file("README.md", "x");

    let (stdout, _stderr, success) = run_dirtree(
        tree.path(),
        &["-m", "kind", "-P", "src/*", "-I", "*/*.log"],
    );
    assert!(success);
    assert_eq!(lines(&stdout), ["f src/main.rs"]);

    let (stdout, _stderr, success) =
        run_dirtree(tree.path(), &["-m", "kind", "-I", "src", "-I", "*.md"]);
    assert!(success);
    // Ignoring a directory keeps its content
    assert_eq!(
        lines(&stdout),
        ["d .", "f src/debug.log", "f src/main.rs"]
    );
}

#[test]
fn test_type_flag() {
    let tree = TestTree::new();
    tree.add_file("dir/file", "x");

    let (stdout, _stderr, success) = run_dirtree(tree.path(), &["-m", "kind", "-t", "f"]);
    assert!(success);
    assert_eq!(lines(&stdout), ["f dir/file"]);

    let (stdout, _stderr, success) = run_dirtree(tree.path(), &["-m", "kind", "-t", "d"]);
    assert!(success);
    assert_eq!(lines(&stdout), ["d .", "d dir"]);
}

#[test]
#[cfg(unix)]
fn test_sample_tree_via_cli() {
    let tree = TestTree::sample();

    let (stdout, _stderr, success) =
        run_dirtree(tree.path(), &["-m", "kind,size,checksum", "--exclude-root"]);
    assert!(success);
    assert_eq!(
        lines(&stdout),
        [
            "d            crc=n/a      A",
            "d            crc=n/a      A/B",
            "?            crc=n/a      A/B/symdirA",
            "f 13b        crc=0451ac5e A/file1",
            "?            crc=n/a      A/symfile1",
        ]
    );
}

#[test]
fn test_json_output() {
    let tree = TestTree::new();
    tree.add_file("file1", "dummy content");
    tree.add_dir("empty");

    let (stdout, _stderr, success) = run_dirtree(tree.path(), &["--json", "-m", "all"]);
    assert!(success);

    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    let items = json.as_array().expect("array");
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["path"], ".");
    assert_eq!(items[1]["path"], "empty");
    assert_eq!(items[1]["kind"], "dir");
    assert_eq!(items[1]["checksum"], "n/a");
    assert_eq!(items[2]["path"], "file1");
    assert_eq!(items[2]["kind"], "file");
    assert_eq!(items[2]["size"], 13);
    assert_eq!(items[2]["checksum"], "0451ac5e");
    assert_eq!(items[2]["symlink"], false);
}

#[test]
fn test_json_respects_mode() {
    let tree = TestTree::new();
    tree.add_file("file1", "dummy content");

    let (stdout, _stderr, success) =
        run_dirtree(tree.path(), &["--json", "-m", "kind", "--exclude-root"]);
    assert!(success);

    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let item = &json[0];
    assert_eq!(item["path"], "file1");
    assert!(item.get("size").is_none());
    assert!(item.get("checksum").is_none());
    assert!(item.get("perm").is_none());
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_root_fails() {
    let tree = TestTree::new();

    dirtree()
        .current_dir(tree.path())
        .arg("missing")
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::starts_with("dirtree: error: "))
        .stderr(predicate::str::contains("missing"));
}

#[test]
fn test_invalid_pattern_fails() {
    let tree = TestTree::new();
    tree.add_file("file", "x");

    dirtree()
        .current_dir(tree.path())
        .args(["-I", "a/b["])
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("configuration error"))
        .stderr(predicate::str::contains("a/b["));
}

#[test]
fn test_invalid_type_fails() {
    let tree = TestTree::new();

    dirtree()
        .current_dir(tree.path())
        .args(["-t", "fx"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("dirtree: error: configuration error"));
}

#[test]
fn test_unknown_mode_field_rejected() {
    let tree = TestTree::new();

    dirtree()
        .current_dir(tree.path())
        .args(["-m", "kind,colour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("colour"));
}

#[test]
fn test_help_lists_flags() {
    dirtree()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--mode"))
        .stdout(predicate::str::contains("--exclude-root"))
        .stdout(predicate::str::contains("--json"));
}
