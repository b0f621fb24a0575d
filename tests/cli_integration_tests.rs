mod common;

use std::fs;

use predicates::prelude::*;

use common::TestFixture;

// ============================================================================
// scan
// ============================================================================

#[test]
fn scan_writes_text_artifact_and_summary() {
    let fixture = TestFixture::new();
    fixture.create_file("main.py", "def run():\n    pass\n");
    fixture.create_file("notes.txt", "remember");
    let output = fixture.output("dump.txt");

    dirdigest!()
        .current_dir(fixture.out.path())
        .arg("scan")
        .arg(fixture.path())
        .arg("-o")
        .arg(&output)
        .arg("--no-settings")
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved"))
        .stdout(predicate::str::contains("2 files, 2/2 items"));

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("СТРУКТУРА ПРОЕКТА:"));
    assert!(text.contains("├── main.py"));
    assert!(text.contains("Функции: run"));
    assert!(text.contains("remember"));
}

#[test]
fn scan_quiet_prints_nothing() {
    let fixture = TestFixture::new();
    fixture.create_file("a.txt", "a");

    dirdigest!()
        .current_dir(fixture.out.path())
        .args(["-q", "scan"])
        .arg(fixture.path())
        .arg("-o")
        .arg(fixture.output("dump.txt"))
        .arg("--no-settings")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn scan_json_format_flag_overrides_extension() {
    let fixture = TestFixture::new();
    fixture.create_file("a.txt", "alpha");
    let output = fixture.output("dump.txt");

    dirdigest!()
        .current_dir(fixture.out.path())
        .arg("scan")
        .arg(fixture.path())
        .args(["-o"])
        .arg(&output)
        .args(["--format", "json", "--no-settings"])
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(value["files"][0]["name"], "a.txt");
    assert_eq!(value["files"][0]["content"], "alpha");
}

#[test]
fn scan_digest_writes_markdown() {
    let fixture = TestFixture::new();
    fixture.create_file("app.py", "class App:\n    pass\n");
    fixture.create_file("README.md", "Hello digest");
    let output = fixture.output("digest.md");

    dirdigest!()
        .current_dir(fixture.out.path())
        .arg("scan")
        .arg(fixture.path())
        .arg("-o")
        .arg(&output)
        .args(["--digest", "--no-settings"])
        .assert()
        .success();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("# Проект: "));
    assert!(text.contains("## README\n\nHello digest"));
    assert!(text.contains("### app.py"));
    assert!(text.contains("Классы: App"));
}

#[test]
fn scan_missing_root_is_config_error() {
    let fixture = TestFixture::new();
    let output = fixture.output("dump.txt");

    dirdigest!()
        .current_dir(fixture.out.path())
        .arg("scan")
        .arg(fixture.path().join("does-not-exist"))
        .arg("-o")
        .arg(&output)
        .arg("--no-settings")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not a directory"));

    assert!(!output.exists());
}

#[test]
fn scan_invalid_size_is_config_error() {
    let fixture = TestFixture::new();
    fixture.create_file("a.txt", "a");

    dirdigest!()
        .current_dir(fixture.out.path())
        .arg("scan")
        .arg(fixture.path())
        .arg("-o")
        .arg(fixture.output("dump.txt"))
        .args(["--max-file-size", "lots", "--no-settings"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn scan_unwritable_destination_fails() {
    let fixture = TestFixture::new();
    fixture.create_file("a.txt", "a");

    dirdigest!()
        .current_dir(fixture.out.path())
        .arg("scan")
        .arg(fixture.path())
        .arg("-o")
        .arg(fixture.output("missing/dir/dump.txt"))
        .arg("--no-settings")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn scan_excluded_items_do_not_appear() {
    let fixture = TestFixture::new();
    fixture.create_file("keep.rs", "fn keep() {}");
    fixture.create_file("drop.log", "DROPPED");
    fixture.create_file("target/out.rs", "TARGET");
    let output = fixture.output("dump.txt");

    dirdigest!()
        .current_dir(fixture.out.path())
        .arg("scan")
        .arg(fixture.path())
        .arg("-o")
        .arg(&output)
        .args(["--exclude-ext", ".log", "--exclude-dir", "target", "--no-settings"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 files, 1/1 items"));

    let text = fs::read_to_string(&output).unwrap();
    assert!(!text.contains("DROPPED"));
    assert!(!text.contains("TARGET"));
}

// ============================================================================
// settings
// ============================================================================

#[test]
fn scan_saves_then_reuses_settings() {
    let fixture = TestFixture::new();
    fixture.create_file("a.txt", "alpha");
    fixture.create_file("b.log", "noise");
    let settings = fixture.output("settings.txt");
    let output = fixture.output("dump.txt");

    dirdigest!()
        .current_dir(fixture.out.path())
        .arg("scan")
        .arg(fixture.path())
        .arg("-o")
        .arg(&output)
        .args(["--exclude-ext", ".log", "--save-settings", "--settings"])
        .arg(&settings)
        .assert()
        .success();

    let saved = fs::read_to_string(&settings).unwrap();
    assert!(saved.contains(&format!("source_folder={}", fixture.path().display())));
    assert!(saved.contains("exclude_extensions=.log"));

    fs::remove_file(&output).unwrap();
    dirdigest!()
        .current_dir(fixture.out.path())
        .arg("scan")
        .arg("--settings")
        .arg(&settings)
        .assert()
        .success();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("alpha"));
    assert!(!text.contains("noise"));
}

// ============================================================================
// tree
// ============================================================================

#[test]
fn tree_prints_structure() {
    let fixture = TestFixture::new();
    fixture.create_file("a.txt", "a");
    fixture.create_file("src/main.rs", "fn main() {}");
    fixture.create_file("node_modules/dep.js", "x");

    dirdigest!()
        .arg("tree")
        .arg(fixture.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("├── a.txt\n└── src/\n    └── main.rs"))
        .stdout(predicate::str::contains("node_modules").not());
}

#[test]
fn tree_respects_max_depth() {
    let fixture = TestFixture::new();
    fixture.create_file("one/two/three.txt", "x");

    dirdigest!()
        .arg("tree")
        .arg(fixture.path())
        .args(["--max-depth", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("└── one/"))
        .stdout(predicate::str::contains("three.txt").not());
}

#[test]
fn tree_rejects_file_root() {
    let fixture = TestFixture::new();
    fixture.create_file("a.txt", "a");

    dirdigest!()
        .arg("tree")
        .arg(fixture.path().join("a.txt"))
        .assert()
        .code(2);
}
