//! Local filesystem wallet store

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::WalletStore;
use crate::backup::{export_wallet, import_wallet};
use crate::error::{Error, Result};
use crate::wallet::Wallet;

/// Wallet document stored in a single JSON file
pub struct LocalStore {
    /// Path of the wallet file
    path: PathBuf,
}

impl LocalStore {
    /// Create a store for a wallet file (the file need not exist yet)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the wallet file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

impl WalletStore for LocalStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Wallet> {
        if !self.path.exists() {
            debug!("No wallet file at {}, starting empty", self.path.display());
            return Ok(Wallet::new());
        }

        let text = fs::read_to_string(&self.path)?;
        let wallet = import_wallet(&text).map_err(|e| {
            Error::InvalidData(format!(
                "Wallet file {} is unreadable: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!(cards = wallet.len(), "Loaded wallet from {}", self.path.display());
        Ok(wallet)
    }

    fn save(&self, wallet: &Wallet) -> Result<()> {
        let dir = self.parent_dir();

        // Create directory if it doesn't exist
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            info!("Created wallet directory: {}", dir.display());
        }

        let json = export_wallet(wallet)?;

        // Write next to the target, then rename over it
        let mut temp = NamedTempFile::new_in(&dir)?;
        temp.write_all(json.as_bytes())?;
        temp.flush()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        debug!(cards = wallet.len(), "Saved wallet to {}", self.path.display());
        Ok(())
    }
}
