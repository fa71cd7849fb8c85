//! Per-directory index pages: a generated `index.md` listing each
//! directory's archived files so Quartz sidebars and folder pages resolve.

use std::fs;
use std::path::Path;

use chrono::Local;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::FilesystemError;
use crate::filter::{extension_of, MirrorRules};

pub const INDEX_FILE: &str = "index.md";

/// Regenerate the index document for one directory, listing its immediate
/// files (not recursive). The existing index and files outside the
/// allow-list are excluded from the listing. If no file survives, nothing
/// is written and any existing index is left untouched. Returns whether an
/// index was written.
///
/// Entries are sorted ascending by filename, so regeneration over an
/// unchanged file set is byte-identical modulo the date field. The link
/// target is the literal on-disk (already sanitised) name.
pub fn generate_index(
    dir: &Path,
    title: &str,
    rules: &MirrorRules,
) -> Result<bool, FilesystemError> {
    let mut names = Vec::new();
    let entries =
        fs::read_dir(dir).map_err(|e| FilesystemError::new("read directory", dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| FilesystemError::new("read directory", dir, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| FilesystemError::new("stat entry in", dir, e))?;
        if !file_type.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == INDEX_FILE || !rules.is_mirrorable(Path::new(&name)) {
            continue;
        }
        names.push(name);
    }

    if names.is_empty() {
        debug!(dir = %dir.display(), "No content files, leaving index untouched");
        return Ok(false);
    }
    names.sort();

    let mut lines = vec![
        "---".to_string(),
        format!("title: {title}"),
        format!("date: {}", Local::now().format("%Y-%m-%d")),
        "---".to_string(),
        String::new(),
        "## 📂 Archived files".to_string(),
        "> Filenames are normalised for stable links; click to preview or download.".to_string(),
        String::new(),
    ];
    for name in &names {
        lines.push(format!("- {} [{name}]({name})", icon_for(name)));
    }

    let index_path = dir.join(INDEX_FILE);
    fs::write(&index_path, lines.join("\n") + "\n")
        .map_err(|e| FilesystemError::new("write index", &index_path, e))?;
    debug!(index = %index_path.display(), entries = names.len(), "Wrote index");
    Ok(true)
}

/// Regenerate indexes for every directory under `root` after a mirror pass.
/// The root itself uses the caller-supplied display title; subdirectories
/// use their prettified directory name. Returns how many indexes were
/// written.
pub fn regenerate_indexes(
    root: &Path,
    display_title: &str,
    rules: &MirrorRules,
) -> Result<usize, FilesystemError> {
    let mut written = 0;
    for entry in WalkDir::new(root) {
        let entry =
            entry.map_err(|e| FilesystemError::from_walk("walk destination tree", root, e))?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let title = if entry.depth() == 0 {
            display_title.to_string()
        } else {
            pretty_title(&entry.file_name().to_string_lossy())
        };
        if generate_index(entry.path(), &title, rules)? {
            written += 1;
        }
    }
    info!(root = %root.display(), written, "Regenerated directory indexes");
    Ok(written)
}

/// Icon for an index entry, by extension category.
fn icon_for(name: &str) -> &'static str {
    match extension_of(Path::new(name)).as_deref() {
        Some(".md" | ".markdown" | ".txt") => "📝",
        Some(".pdf") => "📕",
        Some(".ppt" | ".pptx") => "📊",
        _ => "📄",
    }
}

/// Human-facing title for a sanitised directory name: hyphens become spaces
/// and each word is capitalised.
pub fn pretty_title(name: &str) -> String {
    name.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
