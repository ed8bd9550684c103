use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Shell configuration, stored as `stratus.toml` in the shell home.
///
/// Every field has a default, so a missing file, a missing section or a
/// missing key all behave the same: the default applies. Command-line
/// flags override whatever the file says.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub main: MainSection,

    #[serde(default)]
    pub provider: ProviderSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MainSection {
    pub verbose: bool,
    pub log_level: String,
}

impl Default for MainSection {
    fn default() -> Self {
        Self {
            verbose: false,
            log_level: "INFO".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderSection {
    pub identity_type: String,
    pub region: String,
    pub http_debug: bool,
    pub no_verify_ssl: bool,
}

impl Default for ProviderSection {
    fn default() -> Self {
        Self {
            identity_type: "keystone".to_string(),
            region: "LON".to_string(),
            http_debug: false,
            no_verify_ssl: false,
        }
    }
}

impl Config {
    /// Load configuration from the given path. A missing file yields the
    /// defaults; a present but malformed file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration, degrading a malformed file to the defaults
    /// instead of refusing to start. The returned string, if any, is a
    /// warning for the operator.
    pub fn load_lenient(path: &Path) -> (Self, Option<String>) {
        match Self::load_from(path) {
            Ok(config) => (config, None),
            Err(e) => {
                let warning = format!(
                    "config {} is not usable, falling back to defaults: {}",
                    path.display(),
                    e
                );
                (Self::default(), Some(warning))
            }
        }
    }

    /// Save configuration to the given path, creating parent directories
    /// as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(!config.main.verbose);
        assert_eq!(config.main.log_level, "INFO");
        assert_eq!(config.provider.identity_type, "keystone");
        assert_eq!(config.provider.region, "LON");
        assert!(!config.provider.http_debug);
        assert!(!config.provider.no_verify_ssl);
    }

    #[test]
    fn test_config_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stratus.toml");

        let mut config = Config::default();
        config.main.verbose = true;
        config.provider.region = "SYD".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("does-not-exist.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stratus.toml");
        std::fs::write(&path, "[provider]\nregion = \"DFW\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.provider.region, "DFW");
        assert_eq!(config.provider.identity_type, "keystone");
        assert_eq!(config.main.log_level, "INFO");
    }

    #[test]
    fn test_load_lenient_degrades_malformed_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stratus.toml");
        std::fs::write(&path, "this is not toml [[[").unwrap();

        let (config, warning) = Config::load_lenient(&path);
        assert_eq!(config, Config::default());
        let warning = warning.unwrap();
        assert!(warning.contains("falling back to defaults"));
    }

    #[test]
    fn test_load_lenient_clean_file_has_no_warning() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stratus.toml");
        Config::default().save_to(&path).unwrap();

        let (config, warning) = Config::load_lenient(&path);
        assert_eq!(config, Config::default());
        assert!(warning.is_none());
    }
}
