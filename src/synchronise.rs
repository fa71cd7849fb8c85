//! High-level pipeline: orchestrates fetch → mirror → index per source.
//!
//! For every configured source the pipeline acquires the scratch workspace,
//! checks the repository out into it, mirrors the filtered tree into the
//! destination subtree and regenerates that subtree's directory indexes.
//! One source's failure never aborts the batch: the error is recorded in the
//! report and processing continues with the next source. The scratch
//! workspace is released on every exit path, so it never survives the run.

use tracing::{error, info, warn};

use crate::checkout::{redact_url, CheckoutTool};
use crate::config::{SourceConfig, SyncConfig};
use crate::error::SyncError;
use crate::index::regenerate_indexes;
use crate::mirror::mirror;
use crate::workspace::ScratchWorkspace;

/// Counts for one successfully processed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceStats {
    pub copied: usize,
    pub skipped: usize,
    pub indexed_dirs: usize,
}

/// Outcome of one source's pass through the pipeline.
#[derive(Debug)]
pub struct SourceReport {
    pub name: String,
    pub outcome: Result<SourceStats, SyncError>,
}

/// Aggregated batch result; one entry per configured source.
#[derive(Debug)]
pub struct SyncReport {
    pub sources: Vec<SourceReport>,
}

impl SyncReport {
    pub fn failed(&self) -> usize {
        self.sources.iter().filter(|s| s.outcome.is_err()).count()
    }

    pub fn succeeded(&self) -> usize {
        self.sources.len() - self.failed()
    }
}

/// Entrypoint: mirror and index every configured source sequentially.
pub async fn synchronise<C>(config: &SyncConfig, checkout: &C) -> SyncReport
where
    C: CheckoutTool,
{
    info!(sources = config.sources.len(), "Starting synchronisation run");

    let mut sources = Vec::with_capacity(config.sources.len());
    for source in &config.sources {
        let outcome = process_source(config, source, checkout).await;
        if let Err(e) = &outcome {
            error!(
                source = %source.display_title,
                error = %e,
                "Source failed, continuing with the next one"
            );
        }
        sources.push(SourceReport {
            name: source.display_title.clone(),
            outcome,
        });
    }

    let report = SyncReport { sources };
    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "Synchronisation run finished"
    );
    report
}

async fn process_source<C>(
    config: &SyncConfig,
    source: &SourceConfig,
    checkout: &C,
) -> Result<SourceStats, SyncError>
where
    C: CheckoutTool,
{
    let workspace = ScratchWorkspace::acquire(&config.scratch_dir)?;

    let stats = run_source_steps(config, source, checkout, &workspace).await;

    // The mirrored content is already in place by the time release runs, so
    // a teardown failure is logged, never escalated.
    if let Err(e) = workspace.release() {
        warn!(source = %source.display_title, error = %e, "Workspace teardown failed");
    }

    stats
}

async fn run_source_steps<C>(
    config: &SyncConfig,
    source: &SourceConfig,
    checkout: &C,
    workspace: &ScratchWorkspace,
) -> Result<SourceStats, SyncError>
where
    C: CheckoutTool,
{
    let checkout_dir = workspace.path().join(&source.checkout_name);
    info!(
        source = %source.display_title,
        url = %redact_url(&source.url),
        "Fetching source repository"
    );
    checkout.checkout(&source.url, &checkout_dir, true).await?;

    let destination = config.content_root.join(&source.target_path);
    let mirror_report = mirror(&checkout_dir, &destination, &config.rules)?;
    let indexed_dirs = regenerate_indexes(&destination, &source.display_title, &config.rules)?;

    Ok(SourceStats {
        copied: mirror_report.copied,
        skipped: mirror_report.skipped,
        indexed_dirs,
    })
}
