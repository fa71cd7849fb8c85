use std::path::Path;
use std::process::Command;

use async_trait::async_trait;
use tracing::{error, info};

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::FetchError;

/// Narrow interface over the external version-control checkout tool.
///
/// The pipeline depends only on this trait: the real adapter shells out to
/// `git`, tests substitute a mock. The tool is treated as opaque, potentially
/// slow and network-bound; the only capability required of it is shallow
/// single-revision retrieval into an empty destination directory.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait CheckoutTool: Send + Sync {
    /// Materialise the repository at `url` into `dest`. On failure the
    /// destination's contents are undefined and must be discarded by
    /// workspace teardown, not inspected.
    async fn checkout(&self, url: &str, dest: &Path, depth_one: bool) -> Result<(), FetchError>;
}

/// Process-invocation adapter around `git clone`.
pub struct GitCheckout;

#[async_trait]
impl CheckoutTool for GitCheckout {
    async fn checkout(&self, url: &str, dest: &Path, depth_one: bool) -> Result<(), FetchError> {
        let mut cmd = Command::new("git");
        cmd.arg("clone");
        if depth_one {
            cmd.arg("--depth").arg("1");
        }
        cmd.arg(url).arg(dest);

        let command_line = format!(
            "git clone{} {} {}",
            if depth_one { " --depth 1" } else { "" },
            redact_url(url),
            dest.display()
        );

        let output = match cmd.output() {
            Ok(output) => output,
            Err(e) => {
                error!(command = %command_line, error = %e, "Failed to launch checkout tool");
                return Err(FetchError {
                    command: command_line,
                    detail: format!("failed to launch git: {e}"),
                });
            }
        };

        if output.status.success() {
            info!(command = %command_line, "Checkout completed");
            Ok(())
        } else {
            // git echoes the clone URL in its diagnostics; scrub it the same
            // way as the command line so no token reaches logs or errors.
            let stderr = String::from_utf8_lossy(&output.stderr)
                .replace(url, &redact_url(url))
                .trim()
                .to_string();
            error!(command = %command_line, status = %output.status, "Checkout tool exited with failure");
            Err(FetchError {
                command: command_line,
                detail: format!("{}: {}", output.status, stderr),
            })
        }
    }
}

/// Strip userinfo credentials embedded in a checkout URL.
pub fn redact_url(url: &str) -> String {
    match (url.find("://"), url.find('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}***@{}", &url[..scheme_end + 3], &url[at + 1..])
        }
        _ => url.to_string(),
    }
}
