use std::fs;
use std::path::{Component, Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{error, info};

use crate::checkout::redact_url;
use crate::config::{SourceConfig, SyncConfig};
use crate::error::ConfigError;
use crate::filter::MirrorRules;
use crate::index::pretty_title;

#[derive(Deserialize)]
struct StaticConfig {
    #[serde(default = "default_content_root")]
    content_root: PathBuf,
    #[serde(default = "default_scratch_dir")]
    scratch_dir: PathBuf,
    #[serde(default)]
    sources: Vec<SourceEntry>,
    #[serde(default)]
    rules: MirrorRules,
}

#[derive(Deserialize)]
struct SourceEntry {
    url: String,
    checkout_name: String,
    target_path: PathBuf,
    #[serde(default)]
    display_title: Option<String>,
}

fn default_content_root() -> PathBuf {
    PathBuf::from("content")
}

fn default_scratch_dir() -> PathBuf {
    PathBuf::from(".temp_cache_runtime")
}

static TOKEN_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Z][A-Z0-9_]*)\}").unwrap());

/// Loads a static YAML config file (no secrets) and substitutes credential
/// placeholders like `${ACCESS_TOKEN}` in source URLs from the process
/// environment. Returns a fully merged SyncConfig or a fatal ConfigError.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SyncConfig, ConfigError> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let raw = fs::read_to_string(path_ref).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
        ConfigError::Read {
            path: path_ref.to_path_buf(),
            source: e,
        }
    })?;

    let static_conf: StaticConfig = serde_yaml::from_str(&raw).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
        ConfigError::Parse(e)
    })?;

    let mut sources = Vec::with_capacity(static_conf.sources.len());
    for (index, entry) in static_conf.sources.into_iter().enumerate() {
        validate_entry(index, &entry)?;
        let url = expand_url(&entry.url)?;
        let display_title = entry.display_title.unwrap_or_else(|| {
            let leaf = entry
                .target_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            pretty_title(&leaf)
        });
        info!(
            url = %redact_url(&url),
            target = %entry.target_path.display(),
            "Parsed source from config"
        );
        sources.push(SourceConfig {
            url,
            checkout_name: entry.checkout_name,
            target_path: entry.target_path,
            display_title,
        });
    }

    let config = SyncConfig {
        content_root: static_conf.content_root,
        scratch_dir: static_conf.scratch_dir,
        sources,
        rules: static_conf.rules,
    };
    config.trace_loaded();
    Ok(config)
}

fn validate_entry(index: usize, entry: &SourceEntry) -> Result<(), ConfigError> {
    if entry.url.trim().is_empty() {
        return Err(ConfigError::MalformedSource {
            index,
            reason: "url must not be empty",
        });
    }
    if entry.checkout_name.trim().is_empty() || entry.checkout_name.contains(['/', '\\']) {
        return Err(ConfigError::MalformedSource {
            index,
            reason: "checkout_name must be a plain directory name",
        });
    }
    if entry.target_path.as_os_str().is_empty() || entry.target_path.is_absolute() {
        return Err(ConfigError::MalformedSource {
            index,
            reason: "target_path must be a non-empty relative path",
        });
    }
    if entry
        .target_path
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(ConfigError::MalformedSource {
            index,
            reason: "target_path must not contain `..`",
        });
    }
    Ok(())
}

/// Substitute every `${VAR}` placeholder in a source URL from the
/// environment. A missing variable is fatal: there is nothing safe to fetch
/// without the credential.
fn expand_url(url: &str) -> Result<String, ConfigError> {
    let mut expanded = url.to_string();
    for caps in TOKEN_PLACEHOLDER.captures_iter(url) {
        let name = caps[1].to_string();
        let value = std::env::var(&name).map_err(|_| {
            error!(var = %name, url = %url, "Credential environment variable not set");
            ConfigError::MissingToken {
                name: name.clone(),
                url: url.to_string(),
            }
        })?;
        expanded = expanded.replace(&caps[0], &value);
    }
    Ok(expanded)
}
