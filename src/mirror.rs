//! Copy a fetched repository tree into the content tree: prune excluded
//! directories, filter by extension, sanitise every path segment, overwrite
//! the destination.

use std::fs;
use std::path::Path;

use filetime::FileTime;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::FilesystemError;
use crate::filter::MirrorRules;
use crate::sanitize::sanitize_rel_path;

/// Outcome of one mirror pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MirrorReport {
    pub copied: usize,
    pub skipped: usize,
}

/// Walk `fetched_root`, pruning excluded directories before descent, and
/// copy every mirrorable file to its sanitised location under
/// `destination_root`, creating parent directories as needed.
///
/// Copies are overwrite-always; pre-existing destination files that no
/// longer correspond to a source file are never deleted. Two source files
/// that sanitise to the same destination path silently collide and the
/// later-visited one wins.
pub fn mirror(
    fetched_root: &Path,
    destination_root: &Path,
    rules: &MirrorRules,
) -> Result<MirrorReport, FilesystemError> {
    let mut report = MirrorReport::default();

    let walker = WalkDir::new(fetched_root).into_iter().filter_entry(|entry| {
        !(entry.file_type().is_dir()
            && entry.depth() > 0
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| rules.is_excluded_dir(name)))
    });

    for entry in walker {
        let entry =
            entry.map_err(|e| FilesystemError::from_walk("walk source tree", fetched_root, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !rules.is_mirrorable(path) {
            debug!(path = %path.display(), "Skipping non-mirrorable file");
            report.skipped += 1;
            continue;
        }

        let rel = path.strip_prefix(fetched_root).unwrap();
        let Some(sanitized) = sanitize_rel_path(rel) else {
            warn!(path = %path.display(), "Dropping entry whose path sanitises to nothing");
            report.skipped += 1;
            continue;
        };

        let dest = destination_root.join(&sanitized);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| FilesystemError::new("create directory", parent, e))?;
        }
        fs::copy(path, &dest).map_err(|e| FilesystemError::new("copy file to", &dest, e))?;
        copy_mtime(path, &dest);
        debug!(from = %path.display(), to = %dest.display(), "Mirrored file");
        report.copied += 1;
    }

    info!(
        fetched_root = %fetched_root.display(),
        destination = %destination_root.display(),
        copied = report.copied,
        skipped = report.skipped,
        "Mirror pass complete"
    );
    Ok(report)
}

/// Carry the source's modification time over to the copy. Best-effort: an
/// mtime failure does not fail the copy.
fn copy_mtime(src: &Path, dest: &Path) {
    match fs::metadata(src) {
        Ok(metadata) => {
            let mtime = FileTime::from_last_modification_time(&metadata);
            if let Err(e) = filetime::set_file_mtime(dest, mtime) {
                debug!(error = %e, path = %dest.display(), "Could not preserve modification time");
            }
        }
        Err(e) => {
            debug!(error = %e, path = %src.display(), "Could not read source metadata");
        }
    }
}
