use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

/// Writes a config whose content root lives inside `base`, returning the
/// config path.
fn write_config(base: &std::path::Path) -> std::path::PathBuf {
    let config_path = base.join("sync.yaml");
    let content_root = base.join("content");
    fs::write(
        &config_path,
        format!("content_root: {}\nsources: []\n", content_root.display()),
    )
    .expect("Writing temp config failed");
    config_path
}

#[test]
fn help_lists_the_subcommands() {
    let mut cmd = Command::cargo_bin("quartz-sync").expect("Binary exists");
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(
            predicate::str::contains("sync")
                .and(predicate::str::contains("scaffold"))
                .and(predicate::str::contains("fix-indexes")),
        );
}

#[test]
fn sync_fails_cleanly_when_the_config_file_is_missing() {
    let mut cmd = Command::cargo_bin("quartz-sync").expect("Binary exists");
    cmd.arg("sync").arg("--config").arg("/nonexistent/sync.yaml");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("read config file"));
}

#[test]
fn sync_with_no_sources_succeeds_and_prints_a_report() {
    let base = tempdir().unwrap();
    let config_path = write_config(base.path());

    let mut cmd = Command::cargo_bin("quartz-sync").expect("Binary exists");
    cmd.arg("sync").arg("--config").arg(&config_path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Synchronise complete"));
}

#[test]
fn scaffold_creates_the_topic_skeleton() {
    let base = tempdir().unwrap();
    let config_path = write_config(base.path());

    let mut cmd = Command::cargo_bin("quartz-sync").expect("Binary exists");
    cmd.arg("scaffold")
        .arg("--config")
        .arg(&config_path)
        .arg("Signals and Systems");
    cmd.assert().success();

    let topic = base.path().join("content/signals-and-systems");
    for sub in ["notes", "exams", "homework", "attachments"] {
        assert!(topic.join(sub).is_dir(), "missing {sub}/");
    }
    let landing = fs::read_to_string(topic.join("index.md")).unwrap();
    assert!(landing.contains("title: Signals and Systems"));
}

#[test]
fn fix_indexes_writes_placeholders_only_where_missing() {
    let base = tempdir().unwrap();
    let config_path = write_config(base.path());
    let content_root = base.path().join("content");
    fs::create_dir_all(content_root.join("has-index")).unwrap();
    fs::write(content_root.join("has-index/index.md"), "hand written").unwrap();
    fs::create_dir_all(content_root.join("missing-index")).unwrap();

    let mut cmd = Command::cargo_bin("quartz-sync").expect("Binary exists");
    cmd.arg("fix-indexes").arg("--config").arg(&config_path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1 placeholder"));

    assert_eq!(
        fs::read_to_string(content_root.join("has-index/index.md")).unwrap(),
        "hand written"
    );
    let placeholder =
        fs::read_to_string(content_root.join("missing-index/index.md")).unwrap();
    assert!(placeholder.contains("title: Missing Index"));
}
