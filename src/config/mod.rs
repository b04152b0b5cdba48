use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Transcript fetching settings
    pub youtube: YoutubeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Directory served for every path other than the API
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeConfig {
    /// Base URL for watch pages
    pub base_url: String,

    /// Preferred caption language (first track if not set)
    pub language: Option<String>,

    /// User agent sent with every request
    pub user_agent: String,

    /// Accept-Language header sent with every request
    pub accept_language: String,

    /// Per-request timeout; no timeout if not set
    pub request_timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("."),
        }
    }
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.youtube.com".to_string(),
            language: None,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/85.0.4183.83 Safari/537.36,gzip(gfe)".to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading configuration from {}", config_path.display());
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)
            .context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&content)
            .context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // Current directory wins so a checkout can carry its own config
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("transcript-batch").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        Url::parse(&self.youtube.base_url)
            .with_context(|| format!("Invalid YouTube base URL: {}", self.youtube.base_url))?;

        if self.youtube.user_agent.trim().is_empty() {
            anyhow::bail!("YouTube user agent must not be empty");
        }

        if let Some(language) = &self.youtube.language {
            if language.trim().is_empty() {
                anyhow::bail!("YouTube language must not be empty when set");
            }
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Static Directory: {}", self.server.static_dir.display());
        println!("  Base URL: {}", self.youtube.base_url);
        println!(
            "  Language: {}",
            self.youtube.language.as_deref().unwrap_or("(first available)")
        );
        println!("  Accept-Language: {}", self.youtube.accept_language);
        match self.youtube.request_timeout_secs {
            Some(secs) => println!("  Request Timeout: {}s", secs),
            None => println!("  Request Timeout: none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.static_dir, PathBuf::from("."));
        assert_eq!(config.youtube.base_url, "https://www.youtube.com");
        assert!(config.youtube.request_timeout_secs.is_none());
    }

    #[test]
    fn test_load_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs_err::write(&path, "youtube:\n  language: de\n  request_timeout_secs: 30\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.youtube.language.as_deref(), Some("de"));
        assert_eq!(config.youtube.request_timeout_secs, Some(30));
        assert_eq!(config.youtube.base_url, "https://www.youtube.com");
        assert_eq!(config.server.static_dir, PathBuf::from("."));
    }

    #[test]
    fn test_load_rejects_invalid_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs_err::write(&path, "youtube:\n  base_url: not a url\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = Config::default();
        config.server.static_dir = PathBuf::from("public");
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.server.static_dir, PathBuf::from("public"));
    }
}
