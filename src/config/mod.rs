//! Repository configuration (`.ledgit/config`).
//!
//! The file uses git-config style sections and `key = value` pairs.
//! Section and key names are case-insensitive.
//!
//! # Example
//!
//! ```
//! use ledgit::config::{Config, Settings};
//!
//! let config: Config = "[core]\n  compression = true\n".parse().unwrap();
//! let settings = Settings::from_config(&config).unwrap();
//! assert!(settings.compression);
//! assert!(settings.locking);
//! ```

mod parser;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::infra::read_file_opt;

/// A parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// section -> key -> value, names lowercased.
    entries: BTreeMap<String, BTreeMap<String, String>>,
}

impl Config {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the configuration file at `path`; a missing file is empty.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        match read_file_opt(path.as_ref())? {
            Some(data) => {
                let text = String::from_utf8(data).map_err(|_| {
                    Error::InvalidConfig(format!("{} is not UTF-8", path.as_ref().display()))
                })?;
                text.parse()
            }
            None => Ok(Config::new()),
        }
    }

    /// Gets a raw value.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.entries
            .get(&section.to_lowercase())
            .and_then(|keys| keys.get(&key.to_lowercase()))
            .map(String::as_str)
    }

    /// Gets a boolean value, or `default` when the key is absent.
    ///
    /// `true`/`yes`/`on`/`1` and `false`/`no`/`off`/`0` are accepted.
    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool> {
        match self.get(section, key) {
            None => Ok(default),
            Some(value) => match value.trim().to_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(true),
                "false" | "no" | "off" | "0" => Ok(false),
                _ => Err(Error::InvalidConfig(format!(
                    "{}.{}: invalid boolean value: {}",
                    section, key, value
                ))),
            },
        }
    }

    /// Sets a value.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.entries
            .entry(section.to_lowercase())
            .or_default()
            .insert(key.to_lowercase(), value.to_string());
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(content: &str) -> Result<Self> {
        parser::parse(content)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (section, keys) in &self.entries {
            writeln!(f, "[{}]", section)?;
            for (key, value) in keys {
                writeln!(f, "\t{} = {}", key, value)?;
            }
        }
        Ok(())
    }
}

/// Typed repository settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Store objects zlib-compressed (`core.compression`).
    pub compression: bool,
    /// Hold `.ledgit/lock` during mutations (`core.locking`).
    pub locking: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            compression: false,
            locking: true,
        }
    }
}

impl Settings {
    /// Reads the recognized keys, falling back to defaults.
    pub fn from_config(config: &Config) -> Result<Self> {
        let defaults = Settings::default();
        Ok(Settings {
            compression: config.get_bool("core", "compression", defaults.compression)?,
            locking: config.get_bool("core", "locking", defaults.locking)?,
        })
    }

    /// Renders the settings as the `[core]` section written by `init`.
    pub fn to_config(&self) -> Config {
        let mut config = Config::new();
        config.set("core", "compression", &self.compression.to_string());
        config.set("core", "locking", &self.locking.to_string());
        config
    }

    /// Loads settings from the config file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_config(&Config::load(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_case_insensitive_lookup() {
        let mut config = Config::new();
        config.set("Core", "Compression", "true");
        assert_eq!(config.get("core", "compression"), Some("true"));
        assert_eq!(config.get("CORE", "COMPRESSION"), Some("true"));
        assert_eq!(config.to_string(), "[core]\n\tcompression = true\n");
    }

    #[test]
    fn test_get_bool() {
        let config: Config = "[core]\na = yes\nb = off\nc = maybe\n".parse().unwrap();
        assert!(config.get_bool("core", "a", false).unwrap());
        assert!(!config.get_bool("core", "b", true).unwrap());
        assert!(config.get_bool("core", "missing", true).unwrap());
        assert!(matches!(
            config.get_bool("core", "c", false),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_default_settings_config() {
        let config = Settings::default().to_config();
        assert_eq!(
            config.to_string(),
            "[core]\n\tcompression = false\n\tlocking = true\n"
        );
        assert_eq!(Settings::from_config(&config).unwrap(), Settings::default());
    }

    #[test]
    fn test_settings_round_trip_through_config() {
        let settings = Settings {
            compression: true,
            locking: false,
        };
        let reparsed: Config = settings.to_config().to_string().parse().unwrap();
        assert_eq!(Settings::from_config(&reparsed).unwrap(), settings);
    }

    #[test]
    fn test_display_round_trip() {
        let config: Config = "[core]\ncompression = true\n[extra]\nkey = value\n"
            .parse()
            .unwrap();
        let reparsed: Config = config.to_string().parse().unwrap();
        assert_eq!(reparsed, config);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::load(temp.path().join("config")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config");
        std::fs::write(&path, "[core]\ncompression = true\nlocking = false\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert!(settings.compression);
        assert!(!settings.locking);
    }
}
