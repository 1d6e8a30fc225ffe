//! TOML configuration resolved through the config-dir search path
//!
//! The first `ferrofetch/config.toml` found in platform config-dir
//! precedence order wins; an embedded default covers fresh installs.
//! Callers receive already-parsed values; templates and folder lists are
//! passed through verbatim to the fact modules.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use crate::data::PlatformInfo;
use crate::error::{FetchError, Result};

const DEFAULT_CONFIG: &str = include_str!("../config/config.toml");

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub colors: HashMap<String, String>,
    pub disk: DiskConfig,
    pub gpu: GpuConfig,
    pub cpu: CpuConfig,
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct DisplayConfig {
    pub separator: String,
    pub ascii_path: String,
    pub ascii_color: String,
    pub items: Vec<ConfigEntry>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            separator: ": ".to_string(),
            ascii_path: String::new(),
            ascii_color: String::new(),
            items: Vec::new(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ConfigEntry {
    /// Key label override; empty keeps the fact's own default key
    pub key: String,
    /// Fact selector: title, os, kernel, arch, shell, hostname, domain,
    /// version, cpu_usage, disk, gpu
    pub value: String,
    pub color: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct DiskConfig {
    /// `:`-delimited folder list; empty selects the `/` + `/home` policy
    pub folders: String,
    /// Key template, `%1` = folder path
    pub key: String,
    /// Value template, `%1` used GB, `%2` total GB, `%3` files, `%4` percent
    pub format: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct GpuConfig {
    /// Path override for the PCI library probed at runtime
    pub library: String,
    /// Key template, `%1` = adapter counter
    pub key: String,
    /// Value template, `%1` vendor, `%2` device name
    pub format: String,
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct CpuConfig {
    pub key: String,
    /// Value template, `%1` = busy percentage
    pub format: String,
    /// Interval between the two counter samples
    pub sample_ms: u64,
}

impl Default for CpuConfig {
    fn default() -> Self {
        CpuConfig {
            key: String::new(),
            format: String::new(),
            sample_ms: 200,
        }
    }
}

/// Load the first config found along the platform search path
pub fn load(platform: &PlatformInfo) -> Result<Config> {
    for dir in &platform.config_dirs {
        let path = PathBuf::from(dir).join("ferrofetch/config.toml");
        if !path.exists() {
            continue;
        }
        debug!("loading config from {}", path.display());
        let data = fs::read_to_string(&path)?;
        return toml::de::from_str(&data)
            .map_err(|err| FetchError::Config(format!("{}: {}", path.display(), err)));
    }
    embedded_default()
}

/// The shipped default configuration
pub fn embedded_default() -> Result<Config> {
    toml::de::from_str(DEFAULT_CONFIG)
        .map_err(|err| FetchError::Config(format!("embedded default config: {}", err)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_default_parses_and_orders_items() {
        let config = embedded_default().unwrap();
        assert!(!config.display.items.is_empty());
        assert_eq!(config.display.separator, ": ");
        assert!(config
            .display
            .items
            .iter()
            .any(|entry| entry.value == "gpu"));
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = toml::de::from_str("").unwrap();
        assert_eq!(config.display.separator, ": ");
        assert_eq!(config.cpu.sample_ms, 200);
        assert!(config.disk.folders.is_empty());
        assert!(config.gpu.library.is_empty());
    }

    #[test]
    fn templates_pass_through_verbatim() {
        let config: Config = toml::de::from_str(
            "[disk]\nfolders = \"/:/var\"\nformat = \"%1 of %2\"\n",
        )
        .unwrap();
        assert_eq!(config.disk.folders, "/:/var");
        assert_eq!(config.disk.format, "%1 of %2");
    }
}
