//! Configuration for the UPS hat server
//!
//! Reads/writes ~/.config/ina219-ups-hat/config.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const DEFAULT_DEVICE_NAME: &str = "INA219 UPS Hat";
const DEFAULT_SNAPSHOT_PATH: &str = "/run/ina219-ups-hat/snapshot.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Device name, also used to derive sensor unique ids
    #[serde(default = "default_device_name")]
    pub device_name: String,

    /// JSON file the INA219 poller writes its readings to
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    /// Sensor keys that are not registered (all others are)
    #[serde(default)]
    pub disabled: Vec<String>,
}

fn default_device_name() -> String {
    DEFAULT_DEVICE_NAME.to_string()
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from(DEFAULT_SNAPSHOT_PATH)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_name: default_device_name(),
            snapshot_path: default_snapshot_path(),
            disabled: Vec::new(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ina219-ups-hat").join("config.toml"))
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            tracing::warn!("Could not determine config directory, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", path);
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    tracing::error!("Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::error!("Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save config to file
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    pub fn is_enabled(&self, key: &str) -> bool {
        !self.disabled.iter().any(|k| k == key)
    }

    pub fn enable(&mut self, key: &str) {
        self.disabled.retain(|k| k != key);
    }

    pub fn disable(&mut self, key: &str) {
        if self.is_enabled(key) {
            self.disabled.push(key.to_string());
        }
    }

    /// Lowercase, underscore-separated form of the device name
    pub fn device_slug(&self) -> String {
        let slug: String = self
            .device_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        let slug = slug
            .split('_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_");
        if slug.is_empty() {
            "ups_hat".to_string()
        } else {
            slug
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.disabled.is_empty());
        assert!(config.is_enabled("voltage"));
        assert_eq!(config.snapshot_path, PathBuf::from(DEFAULT_SNAPSHOT_PATH));
    }

    #[test]
    fn test_enable_disable() {
        let mut config = Config::default();

        config.disable("soc_inu");
        config.disable("soc_inu");
        assert_eq!(config.disabled.len(), 1);
        assert!(!config.is_enabled("soc_inu"));
        assert!(config.is_enabled("soc"));

        config.enable("soc_inu");
        assert!(config.is_enabled("soc_inu"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(r#"disabled = ["read_power"]"#).unwrap();
        assert_eq!(config.device_name, DEFAULT_DEVICE_NAME);
        assert!(!config.is_enabled("read_power"));
    }

    #[test]
    fn test_device_slug() {
        assert_eq!(Config::default().device_slug(), "ina219_ups_hat");

        let mut config = Config::default();
        config.device_name = "  --  ".to_string();
        assert_eq!(config.device_slug(), "ups_hat");
    }
}
