use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use site_content::StoreConfig;

/// Default directory for stored content, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = ".site-data";

/// Console settings, read from a TOML file.
///
/// ```toml
/// data_dir = "/var/lib/site"
///
/// [store]
/// content_key = "site_content_v1"
/// consent_key = "cookieConsent"
/// default_locale = "cn"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub data_dir: PathBuf,
    pub store: StoreConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            store: StoreConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load from `path`, or use defaults when no file is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let config: SiteConfig = toml::from_str(raw)?;
        config.store.validate()?;
        Ok(config)
    }

    /// Apply a `--data-dir` override.
    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }
}
