use std::path::PathBuf;

use tracing::{debug, info};

use crate::filter::MirrorRules;

/// One external repository to mirror into the content tree.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Checkout URL, with any credential placeholder already substituted.
    pub url: String,
    /// Directory name for the checkout inside the scratch workspace.
    pub checkout_name: String,
    /// Destination subtree under the content root, relative.
    pub target_path: PathBuf,
    /// Title used for the destination root's index page.
    pub display_title: String,
}

/// Whole-run configuration, constructed once by the loader and passed by
/// reference into the pipeline. Immutable for the duration of a run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub content_root: PathBuf,
    pub scratch_dir: PathBuf,
    pub sources: Vec<SourceConfig>,
    pub rules: MirrorRules,
}

impl SyncConfig {
    pub fn trace_loaded(&self) {
        info!(
            content_root = %self.content_root.display(),
            scratch_dir = %self.scratch_dir.display(),
            sources_count = self.sources.len(),
            "Loaded SyncConfig"
        );
        debug!(?self, "SyncConfig loaded (full debug)");
    }
}
