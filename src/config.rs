//! Configuration file handling for the wallet.
//!
//! The configuration file is stored at `$WALLET_HOME/config.json` and carries
//! the remote API base address along with the background refresh period. The
//! wallet home directory also holds the cache files (see `cache.rs`).

use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_NAME: &str = "wallet";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const TRANSACTIONS_JSON: &str = "transactions.json";
const LAST_SYNC_JSON: &str = "last_sync.json";

/// How often the background refresh re-checks the remote source when no
/// explicit period is configured.
const DEFAULT_REFRESH_PERIOD_SECS: u64 = 300;

/// The `Config` object represents the configuration of the app. You
/// instantiate it by providing the path to `$WALLET_HOME` and from there it
/// loads `$WALLET_HOME/config.json`. It provides paths to the other files
/// expected inside the wallet home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the wallet home directory and an initial `config.json`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the wallet home, e.g. `$HOME/wallet`
    /// - `api_base_url` - The base address of the remote transaction API,
    ///   e.g. `http://localhost:8000`
    ///
    /// # Errors
    /// - Returns an error if the URL does not parse or any file operation fails.
    pub async fn create(dir: impl Into<PathBuf>, api_base_url: &str) -> Result<Self> {
        validate_base_url(api_base_url)?;

        // Create the directory if it does not exist
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the wallet home directory")?;

        // Canonicalize the directory path
        let root = utils::canonicalize(&maybe_relative).await?;
        let config_path = root.join(CONFIG_JSON);

        // Create and save an initial ConfigFile
        let config_file = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            api_base_url: api_base_url.to_string(),
            refresh_period_secs: None,
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that the wallet home exists and that the config file exists
    /// - load the config file
    /// - return the loaded configuration object
    pub async fn load(wallet_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = wallet_home.into();
        let root = utils::canonicalize(&maybe_relative).await?;

        // Validate that the home directory exists.
        let _ = utils::read_dir(&root)
            .await
            .context("Wallet home is missing")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;
        validate_base_url(&config_file.api_base_url)?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The base address of the remote transaction API.
    pub fn api_base_url(&self) -> &str {
        &self.config_file.api_base_url
    }

    /// Points the config at a different remote base address and persists it.
    pub async fn set_api_base_url(&mut self, api_base_url: &str) -> Result<()> {
        validate_base_url(api_base_url)?;
        self.config_file.api_base_url = api_base_url.to_string();
        self.config_file.save(&self.config_path).await
    }

    /// Where the cached transaction collection lives.
    pub fn transactions_path(&self) -> PathBuf {
        self.root.join(TRANSACTIONS_JSON)
    }

    /// Where the last-sync timestamp lives.
    pub fn last_sync_path(&self) -> PathBuf {
        self.root.join(LAST_SYNC_JSON)
    }

    /// The background refresh period.
    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(
            self.config_file
                .refresh_period_secs
                .unwrap_or(DEFAULT_REFRESH_PERIOD_SECS),
        )
    }
}

/// Represents the serialization and deserialization format of the
/// configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "wallet",
///   "config_version": 1,
///   "api_base_url": "http://localhost:8000",
///   "refresh_period_secs": 300
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "wallet"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Base address of the remote transaction API
    api_base_url: String,

    /// Background refresh period in seconds (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_period_secs: Option<u64>,
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        // Validate app_name
        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

/// Rejects base addresses that are not absolute http(s) URLs.
fn validate_base_url(url: &str) -> Result<()> {
    let parsed = url::Url::parse(url).with_context(|| format!("Invalid API base URL '{url}'"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => bail!("Unsupported URL scheme '{other}' in API base URL '{url}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("wallet_home");
        let url = "http://localhost:8000";

        let config = Config::create(&home_dir, url).await.unwrap();

        assert_eq!(url, config.api_base_url());
        assert!(config.config_path().is_file());
        assert_eq!(config.transactions_path().file_name().unwrap(), "transactions.json");
        assert_eq!(config.refresh_period(), Duration::from_secs(300));
    }

    #[tokio::test]
    async fn test_config_create_rejects_bad_url() {
        let dir = TempDir::new().unwrap();
        assert!(Config::create(dir.path().join("a"), "not a url").await.is_err());
        assert!(Config::create(dir.path().join("b"), "ftp://example.com")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_config_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("wallet_home");
        let created = Config::create(&home_dir, "http://localhost:8000")
            .await
            .unwrap();

        let loaded = Config::load(&home_dir).await.unwrap();

        assert_eq!(created.api_base_url(), loaded.api_base_url());
        assert_eq!(created.root(), loaded.root());
    }

    #[tokio::test]
    async fn test_config_load_missing_home_fails() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path().join("does_not_exist")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_config_load_invalid_app_name() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        tokio::fs::create_dir_all(&home).await.unwrap();
        let json = r#"{
            "app_name": "wrong_app",
            "config_version": 1,
            "api_base_url": "http://localhost:8000"
        }"#;
        tokio::fs::write(home.join("config.json"), json).await.unwrap();

        let result = Config::load(&home).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_refresh_period_from_file() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        tokio::fs::create_dir_all(&home).await.unwrap();
        let json = r#"{
            "app_name": "wallet",
            "config_version": 1,
            "api_base_url": "http://localhost:8000",
            "refresh_period_secs": 60
        }"#;
        tokio::fs::write(home.join("config.json"), json).await.unwrap();

        let config = Config::load(&home).await.unwrap();
        assert_eq!(config.refresh_period(), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_set_api_base_url_persists() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        let mut config = Config::create(&home, "http://localhost:8000")
            .await
            .unwrap();

        config
            .set_api_base_url("https://wallet.example.com")
            .await
            .unwrap();

        let reloaded = Config::load(&home).await.unwrap();
        assert_eq!(reloaded.api_base_url(), "https://wallet.example.com");
    }

    #[tokio::test]
    async fn test_config_file_serialization_omits_none_fields() {
        let config = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            api_base_url: "http://localhost:8000".to_string(),
            refresh_period_secs: None,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("refresh_period_secs"));
    }
}
