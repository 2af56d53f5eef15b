//! Client configuration persistence
//!
//! Stored in ~/.config/albumnav/config.json. Every field has a default, so a
//! missing file or a file written by an older version still loads.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::render::CoverSize;

/// Server used when neither the command line nor the config names one
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: Option<String>,
    /// Default for the scan form's recursive toggle
    pub recursive_scan: bool,
    pub cover_width: u32,
    pub cover_height: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let cover = CoverSize::default();
        Self {
            server_url: None,
            recursive_scan: false,
            cover_width: cover.width,
            cover_height: cover.height,
        }
    }
}

impl ClientConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No client config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Self =
            serde_json::from_str(&contents).with_context(|| format!("Failed to parse config {:?}", path))?;

        debug!("Loaded client config from {:?}", path);
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents).with_context(|| format!("Failed to write config to {:?}", path))?;

        debug!("Saved client config to {:?}", path);
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("albumnav").join("config.json"))
    }

    /// Server to talk to: explicit flag or env first, then this file, then the default
    pub fn resolve_server(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| self.server_url.as_deref().map(str::trim).filter(|s| !s.is_empty()))
            .unwrap_or(DEFAULT_SERVER_URL)
            .to_string()
    }

    pub fn cover_size(&self) -> CoverSize {
        CoverSize {
            width: self.cover_width,
            height: self.cover_height,
        }
    }
}
