//! INI file configuration adapter.
//!
//! Strategies live in `[strategy:<id>]` sections:
//!
//! ```ini
//! [strategy:rsi-momentum]
//! name = RSI Momentum
//! buy = rsi < 30 && priceChange > 0
//! sell = rsi > 70 || priceChange < -3
//! param.rsiperiod = 14
//! ```
//!
//! configparser lowercases section names and keys; condition values
//! keep their case.

use configparser::ini::Ini;
use std::path::Path;

use crate::ports::config_port::ConfigPort;

/// Prefix of sections that define a strategy.
pub const STRATEGY_SECTION_PREFIX: &str = "strategy:";

/// Prefix of keys that carry strategy parameters.
pub const PARAM_KEY_PREFIX: &str = "param.";

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }

    /// Sections that define strategies.
    pub fn strategy_sections(&self) -> Vec<String> {
        self.sections()
            .into_iter()
            .filter(|section| section.starts_with(STRATEGY_SECTION_PREFIX))
            .collect()
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }

    fn sections(&self) -> Vec<String> {
        self.config.sections()
    }

    fn keys(&self, section: &str) -> Vec<String> {
        self.config
            .get_map_ref()
            .get(section)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default()
    }
}
