//! File-selection rules: which files belong in the mirror and which
//! directories are pruned before descent.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

/// Allow-list of file extensions and set of excluded directory names.
/// Defaults cover the document, slide, plain-text, image and source/data
/// formats the content tree archives, and prune version-control metadata,
/// editor state and dependency caches.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MirrorRules {
    pub allowed_extensions: BTreeSet<String>,
    pub excluded_dirs: BTreeSet<String>,
}

impl Default for MirrorRules {
    fn default() -> Self {
        let allowed = [
            ".pdf", ".docx", ".pptx", ".doc", ".ppt", ".md", ".markdown", ".txt", ".m", ".mat",
            ".py", ".ipynb", ".c", ".cpp", ".h", ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp",
        ];
        let excluded = [
            ".git",
            ".github",
            ".obsidian",
            "__pycache__",
            ".idea",
            ".vscode",
            "node_modules",
        ];
        Self {
            allowed_extensions: allowed.iter().map(|s| s.to_string()).collect(),
            excluded_dirs: excluded.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl MirrorRules {
    /// Checked during traversal so excluded subtrees are pruned before
    /// descent, not merely filtered after listing.
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.excluded_dirs.contains(name)
    }

    /// A file is mirrorable iff its lower-cased extension is on the
    /// allow-list. Extensionless files are never mirrored.
    pub fn is_mirrorable(&self, path: &Path) -> bool {
        match extension_of(path) {
            Some(ext) => self.allowed_extensions.contains(&ext),
            None => false,
        }
    }
}

/// Lower-cased extension with its leading dot, e.g. `.pdf`.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
}
