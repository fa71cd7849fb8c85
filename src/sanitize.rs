//! Path-segment normalisation for URL-safe Quartz slugs.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_]+").unwrap());
static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\x{4e00}-\x{9fa5}a-z0-9.\-]").unwrap());
static HYPHEN_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").unwrap());

/// Normalise one path segment into the restricted character set Quartz links
/// tolerate: lowercase, whitespace/underscore runs become a single hyphen,
/// anything outside lowercase ASCII letters, digits, hyphen, dot and CJK
/// ideographs is dropped, and hyphen runs are collapsed.
///
/// Total over any input. The empty string maps to the empty string; callers
/// must treat an empty result as "drop this entry", since an empty path
/// segment is invalid.
pub fn sanitize_segment(segment: &str) -> String {
    let lowered = segment.to_lowercase();
    let hyphenated = SPACE_RUNS.replace_all(&lowered, "-");
    let stripped = DISALLOWED.replace_all(&hyphenated, "");
    HYPHEN_RUNS.replace_all(&stripped, "-").into_owned()
}

/// Sanitize every component of a relative path independently, preserving
/// directory depth. Returns `None` when any component sanitises to nothing.
pub fn sanitize_rel_path(rel: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in rel.components() {
        let segment = component.as_os_str().to_string_lossy();
        let clean = sanitize_segment(&segment);
        if clean.is_empty() {
            return None;
        }
        out.push(clean);
    }
    if out.as_os_str().is_empty() {
        None
    } else {
        Some(out)
    }
}
