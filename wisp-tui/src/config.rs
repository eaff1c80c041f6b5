use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Server configuration stored locally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub server_url: String,
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:5000/api".to_string(),
            last_updated: chrono::Utc::now(),
        }
    }
}

/// Configuration manager for the `~/.wisp` directory
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).context("Failed to create .wisp directory")?;
        }

        Ok(Self { config_dir })
    }

    #[cfg(test)]
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Get the `.wisp` configuration directory path
    fn get_config_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home_dir.join(".wisp"))
    }

    fn get_server_config_file(&self) -> PathBuf {
        self.config_dir.join("server_config.json")
    }

    /// Save server configuration
    pub fn save_server_config(&self, config: &ServerConfig) -> Result<()> {
        let config_file = self.get_server_config_file();
        let json = serde_json::to_string_pretty(config)
            .context("Failed to serialize server config")?;

        fs::write(&config_file, json).context("Failed to write server config file")?;

        Ok(())
    }

    /// Load server configuration
    pub fn load_server_config(&self) -> Result<Option<ServerConfig>> {
        let config_file = self.get_server_config_file();

        if !config_file.exists() {
            return Ok(None);
        }

        let json =
            fs::read_to_string(&config_file).context("Failed to read server config file")?;

        let config: ServerConfig =
            serde_json::from_str(&json).context("Failed to parse server config")?;

        Ok(Some(config))
    }

    /// Resolve the server URL: explicit flag first, then the saved config,
    /// then the built-in default. A flag value is persisted for next time.
    pub fn resolve_server_url(&self, override_url: Option<String>) -> String {
        if let Some(url) = override_url {
            let config = ServerConfig {
                server_url: url.clone(),
                last_updated: chrono::Utc::now(),
            };
            if let Err(e) = self.save_server_config(&config) {
                log::warn!("Failed to persist server config: {}", e);
            }
            return url;
        }

        match self.load_server_config() {
            Ok(Some(config)) => config.server_url,
            Ok(None) => ServerConfig::default().server_url,
            Err(e) => {
                log::warn!("Failed to load server config: {}", e);
                ServerConfig::default().server_url
            }
        }
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new().expect("Failed to create config manager")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_server_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_dir(temp_dir.path().to_path_buf());

        let config = ServerConfig {
            server_url: "https://wisp.example.com/api".to_string(),
            last_updated: chrono::Utc::now(),
        };
        manager.save_server_config(&config).unwrap();

        let loaded = manager.load_server_config().unwrap().unwrap();
        assert_eq!(loaded.server_url, "https://wisp.example.com/api");
    }

    #[test]
    fn test_load_missing_config_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_dir(temp_dir.path().to_path_buf());

        assert!(manager.load_server_config().unwrap().is_none());
    }

    #[test]
    fn test_resolve_prefers_override() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_dir(temp_dir.path().to_path_buf());

        let url = manager.resolve_server_url(Some("http://localhost:9999/api".to_string()));
        assert_eq!(url, "http://localhost:9999/api");

        // The override should have been persisted
        let url = manager.resolve_server_url(None);
        assert_eq!(url, "http://localhost:9999/api");
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_dir(temp_dir.path().to_path_buf());

        let url = manager.resolve_server_url(None);
        assert_eq!(url, ServerConfig::default().server_url);
    }
}
