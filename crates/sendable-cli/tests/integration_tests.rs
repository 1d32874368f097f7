//! Integration tests for the auto-sendable CLI
//!
//! These tests verify the CLI behavior end-to-end

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Helper function to create a test CLI command
#[allow(deprecated)]
fn cli() -> Command {
    let mut cmd = Command::cargo_bin("auto-sendable").unwrap();
    cmd.env_remove("RUST_LOG").arg("--no-color");
    cmd
}

/// Helper function to create a temporary Swift package
fn create_test_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let sources = temp_dir.path().join("Sources/App");
    fs::create_dir_all(&sources).unwrap();

    fs::write(
        sources.join("Model.swift"),
        "public struct Point: Codable {\n    let x: Int\n}\n",
    )
    .unwrap();
    fs::write(
        sources.join("Store.swift"),
        "public class Store {\n    var items: [Int] = []\n}\n",
    )
    .unwrap();
    fs::write(sources.join("Internal.swift"), "struct Hidden {}\n").unwrap();

    temp_dir
}

fn read(dir: &TempDir, relative: &str) -> String {
    fs::read_to_string(dir.path().join(relative)).unwrap()
}

#[test]
fn test_help_command() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("auto-sendable rewrites Swift sources"))
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_version_command() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(VERSION));
}

#[test]
fn test_version_detailed() {
    cli()
        .args(["version", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("auto-sendable {VERSION}")))
        .stdout(predicate::str::contains("Build information:"))
        .stdout(predicate::str::contains(format!("Engine: sendable-core {VERSION}")));
}

#[test]
fn test_sendable_rewrites_in_place() {
    let project = create_test_project();
    cli()
        .arg("sendable")
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Rewrote"))
        .stdout(predicate::str::contains("Files rewritten: 2"));

    assert_eq!(
        read(&project, "Sources/App/Model.swift"),
        "public struct Point: Codable, Sendable {\n    let x: Int\n}\n"
    );
    assert_eq!(
        read(&project, "Sources/App/Store.swift"),
        "public class Store: @unchecked Sendable {\n    var items: [Int] = []\n}\n"
    );
    assert_eq!(read(&project, "Sources/App/Internal.swift"), "struct Hidden {}\n");
}

#[test]
fn test_second_run_changes_nothing() {
    let project = create_test_project();
    cli().arg("sendable").arg(project.path()).assert().success();
    cli()
        .args(["sendable", "--check"])
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to rewrite"));
}

#[test]
fn test_check_exits_with_one_and_leaves_files() {
    let project = create_test_project();
    cli()
        .args(["sendable", "--check"])
        .arg(project.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Would rewrite"));

    assert_eq!(
        read(&project, "Sources/App/Model.swift"),
        "public struct Point: Codable {\n    let x: Int\n}\n"
    );
}

#[test]
fn test_diff_prints_unified_diff() {
    let project = create_test_project();
    cli()
        .args(["sendable", "--diff"])
        .arg(project.path().join("Sources/App/Model.swift"))
        .assert()
        .success()
        .stdout(predicate::str::contains("-public struct Point: Codable {"))
        .stdout(predicate::str::contains("+public struct Point: Codable, Sendable {"));
}

#[test]
fn test_exclude_pattern() {
    let project = create_test_project();
    cli()
        .args(["sendable", "--exclude", "**/Store.swift"])
        .arg(project.path())
        .assert()
        .success();

    assert_eq!(
        read(&project, "Sources/App/Store.swift"),
        "public class Store {\n    var items: [Int] = []\n}\n"
    );
}

#[test]
fn test_immutable_classes_flag() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("Settings.swift");
    fs::write(&file, "public class Settings {\n    let theme = \"dark\"\n}\n").unwrap();

    cli()
        .args(["sendable", "--immutable-classes"])
        .arg(&file)
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "public final class Settings: Sendable {\n    let theme = \"dark\"\n}\n"
    );
}

#[test]
fn test_config_file_enables_protocols() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(".autosendable.toml"),
        "[rewrite]\nprotocols = true\n",
    )
    .unwrap();
    let file = temp_dir.path().join("Store.swift");
    fs::write(&file, "public protocol Store {}\n").unwrap();

    cli().arg("sendable").arg(temp_dir.path()).assert().success();
    assert_eq!(fs::read_to_string(&file).unwrap(), "public protocol Store: Sendable {}\n");
}

#[test]
fn test_invalid_config_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("bad.toml");
    fs::write(&config, "[rewrite]\npasses = []\n").unwrap();

    cli()
        .args(["sendable", "--config"])
        .arg(&config)
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("rewrite.passes must not be empty"));
}

#[test]
fn test_unchecked_marks_every_class() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("Legacy.swift");
    fs::write(&file, "class A {}\nstruct B {}\n").unwrap();

    cli().arg("unchecked").arg(&file).assert().success();
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "class A: @unchecked Sendable {}\nstruct B {}\n"
    );
}

#[test]
fn test_attribute_command() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("View.swift");
    fs::write(
        &file,
        "/// Screen\npublic final class Screen {}\nfunc helper() {}\n",
    )
    .unwrap();

    cli()
        .args(["attribute", "@MainActor", "--kind", "class"])
        .arg(&file)
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "/// Screen\n@MainActor public final class Screen {}\nfunc helper() {}\n"
    );
}

#[test]
fn test_syntax_error_fails_only_that_file() {
    let temp_dir = TempDir::new().unwrap();
    let broken = temp_dir.path().join("Broken.swift");
    let good = temp_dir.path().join("Good.swift");
    fs::write(&broken, "public struct A {\n").unwrap();
    fs::write(&good, "public enum E { case a }\n").unwrap();

    cli()
        .arg("sendable")
        .arg(temp_dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Broken.swift"))
        .stdout(predicate::str::contains("Files failed: 1"));

    assert_eq!(fs::read_to_string(&broken).unwrap(), "public struct A {\n");
    assert_eq!(
        fs::read_to_string(&good).unwrap(),
        "public enum E: Sendable { case a }\n"
    );
}

#[test]
fn test_no_swift_files() {
    let temp_dir = TempDir::new().unwrap();
    cli()
        .arg("sendable")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No Swift files found"));
}

#[test]
fn test_config_init_and_show() {
    let temp_dir = TempDir::new().unwrap();
    cli()
        .current_dir(temp_dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".autosendable.toml"));
    assert!(read(&temp_dir, ".autosendable.toml").contains("passes"));

    cli()
        .current_dir(temp_dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    cli()
        .current_dir(temp_dir.path())
        .args(["config", "show", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"uncheckedAttribute\": \"unchecked\""));
}

#[test]
fn test_config_schema() {
    cli()
        .args(["config", "schema"])
        .assert()
        .success()
        .stdout(predicate::str::contains("immutable-classes"));
}

#[test]
fn test_generate_completion() {
    cli()
        .args(["--generate-completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("auto-sendable"));
}
