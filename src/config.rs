//! Resolver configuration loaded from TOML.
//!
//! ```toml
//! [resolvers]
//! enabled = ["doi", "pubmed", "arxiv"]
//! only_unresolved = true
//! doi_base_url = "https://doi.org/"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::resolver::IdentifierKind;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CitelinkConfig {
    /// Settings for the embedded-identifier resolvers.
    pub resolvers: ResolverSettings,
}

/// `[resolvers]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverSettings {
    /// Resolver sources allowed to run. Defaults to every known source.
    pub enabled: Vec<String>,
    /// Skip references that already carry a candidate URI.
    pub only_unresolved: bool,
    /// Prefix for DOI candidate URIs.
    pub doi_base_url: String,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            enabled: IdentifierKind::ALL
                .iter()
                .map(|kind| kind.source().to_string())
                .collect(),
            only_unresolved: false,
            doi_base_url: IdentifierKind::Doi.default_base().to_string(),
        }
    }
}

impl CitelinkConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed TOML, unknown keys, or values rejected by
    /// [`CitelinkConfig::validate`].
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).context("Invalid config syntax")?;
        config.validate()?;
        Ok(config)
    }

    /// Validates resolver names and the DOI base URL.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending value.
    pub fn validate(&self) -> Result<()> {
        for name in &self.resolvers.enabled {
            if IdentifierKind::from_source(name).is_none() {
                let known: Vec<&str> = IdentifierKind::ALL.iter().map(|k| k.source()).collect();
                bail!(
                    "Invalid config value in `resolvers.enabled`: '{name}'. Expected one of: {}",
                    known.join(", ")
                );
            }
        }

        let base = self.resolvers.doi_base_url.trim();
        if base.is_empty() {
            bail!("Invalid config value for `resolvers.doi_base_url`: must not be empty");
        }
        Url::parse(base).with_context(|| {
            format!("Invalid config value for `resolvers.doi_base_url`: '{base}' is not an absolute URL")
        })?;
        Ok(())
    }

    /// Returns true if `source` is listed in `resolvers.enabled`.
    #[must_use]
    pub fn is_enabled(&self, source: &str) -> bool {
        self.resolvers
            .enabled
            .iter()
            .any(|name| name.trim().eq_ignore_ascii_case(source))
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// File contents when present, defaults otherwise.
    pub config: CitelinkConfig,
    /// Indicates whether configuration was loaded from disk.
    pub loaded_from_file: bool,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/citelink/config.toml`
/// 2. `$HOME/.config/citelink/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("citelink")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("citelink")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from the default path, falling back to defaults if absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or is invalid.
pub fn load_default_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    match path.as_deref() {
        Some(path_ref) if path_ref.exists() => {
            let config = load_config(path_ref)?;
            Ok(LoadedConfig {
                path,
                config,
                loaded_from_file: true,
            })
        }
        _ => {
            debug!(path = ?path, "No config file, using defaults");
            Ok(LoadedConfig {
                path,
                config: CitelinkConfig::default(),
                loaded_from_file: false,
            })
        }
    }
}

/// Loads and validates the config file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is invalid.
pub fn load_config(path: &Path) -> Result<CitelinkConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    let config = CitelinkConfig::from_toml_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
    debug!(path = %path.display(), "Loaded config file");
    Ok(config)
}
