use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn quire(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("quire").unwrap();
    cmd.env("QUIRE_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_signed_in_edit_cycle() {
    let temp_dir = tempfile::tempdir().unwrap();
    let home = temp_dir.path();

    quire(home)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized quire store"));

    quire(home)
        .args(["signup", "admin", "secret!1"])
        .assert()
        .success();

    quire(home)
        .args(["signin", "admin", "secret!1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome!"));

    quire(home)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("admin"));

    quire(home)
        .args(["new", "notes.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("notes.txt has been created."));

    quire(home)
        .args(["edit", "notes.txt", "--content", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("notes.txt has been updated."));

    quire(home)
        .args(["history", "notes.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("notes_1.txt"));

    assert!(home.join("archive/notes_1.txt").is_file());
    assert_eq!(
        std::fs::read_to_string(home.join("content/notes.txt")).unwrap(),
        "hello"
    );

    quire(home)
        .arg("signout")
        .assert()
        .success()
        .stdout(predicate::str::contains("You have been signed out."));

    quire(home)
        .args(["edit", "notes.txt", "--content", "defaced"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("You must be signed in to do that!"));

    quire(home)
        .args(["view", "notes.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("text/plain"))
        .stdout(predicate::str::contains("hello"))
        .stdout(predicate::str::contains("defaced").not());
}

#[test]
fn test_markdown_is_rendered() {
    let temp_dir = tempfile::tempdir().unwrap();
    let home = temp_dir.path();
    std::fs::create_dir_all(home.join("content")).unwrap();
    std::fs::write(home.join("content/about.md"), "# About").unwrap();

    quire(home)
        .args(["view", "about.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("text/html"))
        .stdout(predicate::str::contains("<h1>About</h1>"));

    quire(home)
        .args(["view", "about.md", "--raw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# About"))
        .stdout(predicate::str::contains("<h1>").not());
}

#[test]
fn test_missing_document_points_back_to_listing() {
    let temp_dir = tempfile::tempdir().unwrap();

    quire(temp_dir.path())
        .args(["view", "notafile.ext"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("notafile.ext does not exist."))
        .stderr(predicate::str::contains("quire list"));
}

#[test]
fn test_flash_is_shown_once() {
    let temp_dir = tempfile::tempdir().unwrap();
    let home = temp_dir.path();

    quire(home)
        .args(["new", "notes.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("You must be signed in to do that!"));

    quire(home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No documents yet."))
        .stderr(predicate::str::contains("signed in").not());
}

#[test]
fn test_bad_password_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    let home = temp_dir.path();

    quire(home)
        .args(["signup", "admin", "secret!1"])
        .assert()
        .success();

    quire(home)
        .args(["signin", "admin", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid credentials."));

    quire(home)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in."));
}

#[test]
fn test_corrupt_credentials_are_fatal() {
    let temp_dir = tempfile::tempdir().unwrap();
    let home = temp_dir.path();
    std::fs::write(home.join("users.json"), "{ not json").unwrap();

    quire(home)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Credential store is corrupt"));
}

#[test]
fn test_config_round_trip() {
    let temp_dir = tempfile::tempdir().unwrap();
    let home = temp_dir.path();

    quire(home)
        .args(["config", "archive-dir", "snapshots"])
        .assert()
        .success()
        .stdout(predicate::str::contains("archive-dir set to snapshots"));

    quire(home)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("archive-dir = snapshots"))
        .stdout(predicate::str::contains("content-dir = content"));
}
