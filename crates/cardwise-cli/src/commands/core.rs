//! Shared command utilities
//!
//! This module contains:
//! - `load_config` - Layered config plus the `--wallet` override
//! - `open_advisor` - Advisor over the local wallet file
//! - `confirm` - Interactive yes/no prompt

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use cardwise_core::{AIClient, CardAdvisor, Config, LocalStore};
use tracing::debug;

/// Load config; `--wallet` wins over every other wallet setting
pub fn load_config(wallet: Option<PathBuf>) -> Result<Config> {
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(path) = wallet {
        config.wallet.path = Some(path);
    }
    Ok(config)
}

/// Advisor over the configured wallet file, with AI when configured
pub fn open_advisor(config: &Config) -> CardAdvisor<LocalStore> {
    let ai = AIClient::from_config(&config.ai);
    if ai.is_none() {
        debug!("No AI backend configured; AI commands are unavailable");
    }
    CardAdvisor::new(ai, LocalStore::new(config.wallet_path()))
}

/// Ask a yes/no question on stdin (default: no)
pub fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
