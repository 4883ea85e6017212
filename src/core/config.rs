use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    pub base_url: String,
    /// Second host tried when `base_url` fails.
    #[serde(default)]
    pub alternate_base_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CoinGeckoProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub yahoo: Option<YahooProviderConfig>,
    pub coingecko: Option<CoinGeckoProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            yahoo: Some(YahooProviderConfig {
                base_url: "https://query1.finance.yahoo.com".to_string(),
                alternate_base_url: Some("https://query2.finance.yahoo.com".to_string()),
            }),
            coingecko: Some(CoinGeckoProviderConfig {
                base_url: "https://api.coingecko.com/api/v3".to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    pub data_path: Option<String>,
}

impl AppConfig {
    /// Loads the default config file, falling back to built-in defaults when
    /// it does not exist yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "hustle", "hustle")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "hustle", "hustle")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
data_path: "/tmp/hustle"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.data_path.as_deref(), Some("/tmp/hustle"));
        let yahoo = config.providers.yahoo.expect("yahoo defaults");
        assert_eq!(yahoo.base_url, "https://query1.finance.yahoo.com");
        assert_eq!(
            yahoo.alternate_base_url.as_deref(),
            Some("https://query2.finance.yahoo.com")
        );
        assert!(config.providers.coingecko.is_some());

        let yaml_str_with_providers = r#"
providers:
  yahoo:
    base_url: "http://example.com/yahoo"
  coingecko:
    base_url: "http://example.com/coingecko"
        "#;
        let config_with_providers: AppConfig =
            serde_yaml::from_str(yaml_str_with_providers).unwrap();
        let yahoo = config_with_providers.providers.yahoo.unwrap();
        assert_eq!(yahoo.base_url, "http://example.com/yahoo");
        assert!(yahoo.alternate_base_url.is_none());
        assert_eq!(
            config_with_providers.providers.coingecko.unwrap().base_url,
            "http://example.com/coingecko"
        );
        assert!(config_with_providers.data_path.is_none());
    }

    #[test]
    fn test_custom_data_path_wins() {
        let config = AppConfig {
            data_path: Some("/srv/hustle".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(
            config.default_data_path().unwrap(),
            PathBuf::from("/srv/hustle")
        );
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load_from_path(dir.path().join("absent.yaml"));
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
