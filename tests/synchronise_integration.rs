use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use quartz_sync::checkout::MockCheckoutTool;
use quartz_sync::config::{SourceConfig, SyncConfig};
use quartz_sync::error::{FetchError, SyncError};
use quartz_sync::filter::MirrorRules;
use quartz_sync::index::INDEX_FILE;
use quartz_sync::synchronise::synchronise;

fn source(url: &str, checkout_name: &str, target: &str, title: &str) -> SourceConfig {
    SourceConfig {
        url: url.to_string(),
        checkout_name: checkout_name.to_string(),
        target_path: PathBuf::from(target),
        display_title: title.to_string(),
    }
}

fn config(base: &Path, sources: Vec<SourceConfig>) -> SyncConfig {
    SyncConfig {
        content_root: base.join("content"),
        scratch_dir: base.join(".temp_cache_runtime"),
        sources,
        rules: MirrorRules::default(),
    }
}

fn fake_repo(dest: &Path) {
    fs::create_dir_all(dest.join("Unit 1")).unwrap();
    fs::create_dir_all(dest.join(".git")).unwrap();
    fs::write(dest.join("Unit 1/Lecture_Notes v2.PDF"), "pdf").unwrap();
    fs::write(dest.join("README.md"), "# repo").unwrap();
    fs::write(dest.join(".git/config"), "[core]").unwrap();
    fs::write(dest.join("build.log"), "noise").unwrap();
}

#[tokio::test]
async fn happy_path_fetches_mirrors_and_indexes_one_source() {
    let base = tempdir().unwrap();
    let config = config(
        base.path(),
        vec![source(
            "https://example.com/signals.git",
            "signals",
            "signal-and-system/archives",
            "Signals Archive",
        )],
    );

    let mut checkout = MockCheckoutTool::new();
    checkout
        .expect_checkout()
        .withf(|url, dest, depth_one| {
            url == "https://example.com/signals.git"
                && dest.ends_with("signals")
                && *depth_one
        })
        .returning(|_, dest, _| {
            fake_repo(dest);
            Ok(())
        });

    let report = synchronise(&config, &checkout).await;

    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 0);
    let stats = report.sources[0].outcome.as_ref().unwrap();
    assert_eq!(stats.copied, 2); // the PDF and the README
    assert_eq!(stats.skipped, 1); // build.log
    assert_eq!(stats.indexed_dirs, 2);

    let dest = base.path().join("content/signal-and-system/archives");
    assert!(dest.join("unit-1/lecture-notes-v2.pdf").exists());
    assert!(dest.join("readme.md").exists());
    assert!(!dest.join(".git").exists());

    let top_index = fs::read_to_string(dest.join(INDEX_FILE)).unwrap();
    assert!(top_index.contains("title: Signals Archive"));
    assert!(top_index.contains("[readme.md](readme.md)"));
    let unit_index = fs::read_to_string(dest.join("unit-1").join(INDEX_FILE)).unwrap();
    assert!(unit_index.contains("[lecture-notes-v2.pdf](lecture-notes-v2.pdf)"));

    // Cleanup invariant: the scratch workspace never survives the run.
    assert!(!base.path().join(".temp_cache_runtime").exists());
}

#[tokio::test]
async fn one_failing_source_does_not_abort_the_batch() {
    let base = tempdir().unwrap();
    let config = config(
        base.path(),
        vec![
            source(
                "https://unreachable.invalid/one.git",
                "one",
                "broken",
                "Broken Source",
            ),
            source(
                "https://example.com/two.git",
                "two",
                "working",
                "Working Source",
            ),
        ],
    );

    let mut checkout = MockCheckoutTool::new();
    checkout
        .expect_checkout()
        .withf(|url, _, _| url.contains("unreachable"))
        .returning(|_, _, _| {
            Err(FetchError {
                command: "git clone --depth 1 https://unreachable.invalid/one.git".to_string(),
                detail: "exit status: 128: could not resolve host".to_string(),
            })
        });
    checkout
        .expect_checkout()
        .withf(|url, _, _| url.contains("two.git"))
        .returning(|_, dest, _| {
            fs::create_dir_all(dest).unwrap();
            fs::write(dest.join("notes.md"), "ok").unwrap();
            Ok(())
        });

    let report = synchronise(&config, &checkout).await;

    assert_eq!(report.failed(), 1);
    assert_eq!(report.succeeded(), 1);
    assert!(matches!(
        report.sources[0].outcome,
        Err(SyncError::Fetch(_))
    ));

    // The failing source produced nothing; the working one is fully mirrored
    // and indexed.
    assert!(!base.path().join("content/broken").exists());
    assert!(base.path().join("content/working/notes.md").exists());
    assert!(base.path().join("content/working").join(INDEX_FILE).exists());

    // Cleanup invariant holds even after a fetch failure.
    assert!(!base.path().join(".temp_cache_runtime").exists());
}

#[tokio::test]
async fn rerunning_an_unchanged_source_reproduces_the_destination() {
    let base = tempdir().unwrap();
    let config = config(
        base.path(),
        vec![source(
            "https://example.com/stable.git",
            "stable",
            "archive",
            "Archive",
        )],
    );

    let mut checkout = MockCheckoutTool::new();
    checkout.expect_checkout().returning(|_, dest, _| {
        fake_repo(dest);
        Ok(())
    });

    let first = synchronise(&config, &checkout).await;
    let index_after_first =
        fs::read_to_string(base.path().join("content/archive").join(INDEX_FILE)).unwrap();
    let second = synchronise(&config, &checkout).await;
    let index_after_second =
        fs::read_to_string(base.path().join("content/archive").join(INDEX_FILE)).unwrap();

    assert_eq!(first.sources[0].outcome.as_ref().unwrap().copied, 2);
    assert_eq!(second.sources[0].outcome.as_ref().unwrap().copied, 2);
    // Entry lists are deterministic given a deterministic file set.
    assert_eq!(index_after_first, index_after_second);
    assert!(!base.path().join(".temp_cache_runtime").exists());
}
