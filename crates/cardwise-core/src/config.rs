//! Application configuration
//!
//! Settings come from three layers, later ones winning:
//! 1. Built-in defaults
//! 2. Optional TOML file (~/.config/cardwise/config.toml)
//! 3. Environment variables (`AI_BACKEND`, `OPENAI_COMPATIBLE_*`, `CARDWISE_WALLET`)
//!
//! ```toml
//! [ai]
//! backend = "openai_compatible"
//! host = "https://api.openai.com"
//! model = "gpt-4o-mini"
//! api_key = "sk-..."
//!
//! [wallet]
//! path = "/home/me/wallet.json"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::ai::DEFAULT_MODEL;
use crate::error::{Error, Result};
use crate::store::default_wallet_path;

/// AI backend settings
#[derive(Debug, Clone, PartialEq)]
pub struct AiConfig {
    /// Backend name (openai_compatible, mock)
    pub backend: String,
    pub host: Option<String>,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            backend: "openai_compatible".to_string(),
            host: None,
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
        }
    }
}

/// Wallet storage settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalletConfig {
    /// Wallet file; the platform data dir when unset
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub ai: AiConfig,
    pub wallet: WalletConfig,
}

impl Config {
    /// Defaults, then the config file (if present), then the environment
    pub fn load() -> Result<Self> {
        let mut config = match default_config_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Read a config file; a missing file yields the defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        parse_config(&content)
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from a variable lookup (non-empty values only)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(backend) = get("AI_BACKEND") {
            self.ai.backend = backend;
        }
        if let Some(host) = get("OPENAI_COMPATIBLE_HOST") {
            self.ai.host = Some(host);
        }
        if let Some(model) = get("OPENAI_COMPATIBLE_MODEL") {
            self.ai.model = model;
        }
        if let Some(key) = get("OPENAI_COMPATIBLE_API_KEY") {
            self.ai.api_key = Some(key);
        }
        if let Some(path) = get("CARDWISE_WALLET") {
            self.wallet.path = Some(PathBuf::from(path));
        }
    }

    /// Where the wallet document lives
    pub fn wallet_path(&self) -> PathBuf {
        self.wallet.path.clone().unwrap_or_else(default_wallet_path)
    }
}

/// Default config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cardwise").join("config.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    ai: Option<RawAi>,
    wallet: Option<RawWallet>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAi {
    backend: Option<String>,
    host: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawWallet {
    path: Option<PathBuf>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = Config::default();

    if let Some(ai) = raw.ai {
        if let Some(backend) = ai.backend {
            config.ai.backend = backend;
        }
        if ai.host.is_some() {
            config.ai.host = ai.host;
        }
        if let Some(model) = ai.model {
            config.ai.model = model;
        }
        if ai.api_key.is_some() {
            config.ai.api_key = ai.api_key;
        }
    }

    if let Some(wallet) = raw.wallet {
        config.wallet.path = wallet.path;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.ai.backend, "openai_compatible");
        assert_eq!(config.ai.model, "gpt-4o-mini");
        assert!(config.ai.host.is_none());
        assert_eq!(config.wallet_path(), default_wallet_path());
    }

    #[test]
    fn test_parse_full_file() {
        let config = parse_config(
            r#"
[ai]
backend = "mock"
host = "http://localhost:8000"
model = "llama3.2"
api_key = "secret"

[wallet]
path = "/tmp/my-wallet.json"
"#,
        )
        .unwrap();

        assert_eq!(config.ai.backend, "mock");
        assert_eq!(config.ai.host.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.ai.model, "llama3.2");
        assert_eq!(config.ai.api_key.as_deref(), Some("secret"));
        assert_eq!(config.wallet_path(), PathBuf::from("/tmp/my-wallet.json"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = parse_config("[ai]\nhost = \"http://h\"\n").unwrap();
        assert_eq!(config.ai.backend, "openai_compatible");
        assert_eq!(config.ai.model, "gpt-4o-mini");
        assert!(config.wallet.path.is_none());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let err = parse_config("[ai\nhost = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = parse_config("[ai]\nhots = \"typo\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::from_file(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[ai]\nbackend = \"mock\"\n").unwrap();
        assert_eq!(Config::from_file(&path).unwrap().ai.backend, "mock");
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = parse_config("[ai]\nmodel = \"from-file\"\nhost = \"http://file\"\n").unwrap();
        let vars: HashMap<&str, &str> = [
            ("OPENAI_COMPATIBLE_MODEL", "from-env"),
            ("OPENAI_COMPATIBLE_HOST", "  "),
            ("CARDWISE_WALLET", "/data/w.json"),
        ]
        .into_iter()
        .collect();

        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.ai.model, "from-env");
        // Blank values are ignored
        assert_eq!(config.ai.host.as_deref(), Some("http://file"));
        assert_eq!(config.wallet_path(), PathBuf::from("/data/w.json"));
    }
}
