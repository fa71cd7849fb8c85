//! One-shot helpers that seed the content tree with placeholder pages.
//! Not part of the mirror pipeline; invoked by their own subcommands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;
use walkdir::WalkDir;

use crate::index::{pretty_title, INDEX_FILE};
use crate::sanitize::sanitize_segment;

const TOPIC_SUBDIRS: [&str; 4] = ["notes", "exams", "homework", "attachments"];

/// Create the standard skeleton for a new topic under the content root:
/// the conventional subfolders plus a landing page linking them. Returns
/// the topic directory.
pub fn create_topic(content_root: &Path, title: &str) -> Result<PathBuf> {
    let slug = sanitize_segment(title);
    if slug.is_empty() {
        bail!("topic title {title:?} sanitises to an empty slug");
    }
    let topic_dir = content_root.join(&slug);
    for sub in TOPIC_SUBDIRS {
        let dir = topic_dir.join(sub);
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let landing = format!(
        "---\ntitle: {title}\nstatus: public\n---\n\n# {title}\n\n## 📂 Resources\n\
         - [[notes/|Notes]]\n- [[exams/|Past exams]]\n- [[homework/|Homework]]\n\
         - [[attachments/|Attachments]]\n"
    );
    let landing_path = topic_dir.join(INDEX_FILE);
    fs::write(&landing_path, landing)
        .with_context(|| format!("failed to write {}", landing_path.display()))?;

    info!(topic = %topic_dir.display(), "Created topic skeleton");
    Ok(topic_dir)
}

/// Walk the content root and write a minimal placeholder index into every
/// directory that lacks one, so sidebar and folder pages resolve. Existing
/// indexes are never touched. Returns how many placeholders were created.
pub fn fill_missing_indexes(content_root: &Path) -> Result<usize> {
    let mut created = 0;
    for entry in WalkDir::new(content_root).min_depth(1) {
        let entry = entry.context("failed to walk content root")?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let index_path = entry.path().join(INDEX_FILE);
        if index_path.exists() {
            continue;
        }
        let title = pretty_title(&entry.file_name().to_string_lossy());
        let body = format!("---\ntitle: {title}\n---\n\n# {title}\n");
        fs::write(&index_path, body)
            .with_context(|| format!("failed to write {}", index_path.display()))?;
        info!(index = %index_path.display(), "Created placeholder index");
        created += 1;
    }
    info!(root = %content_root.display(), created, "Filled missing indexes");
    Ok(created)
}
