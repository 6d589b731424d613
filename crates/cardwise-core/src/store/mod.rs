//! Wallet persistence with pluggable stores
//!
//! The whole wallet lives in one JSON document, the same shape as a backup
//! (see [`crate::backup`]). There is no transactional layer: a store loads
//! the whole document and saves the whole document.
//!
//! # Architecture
//!
//! - `WalletStore` trait defines the interface for storage backends
//! - `LocalStore` keeps the document in a file on disk
//! - `MemoryStore` keeps the encoded document in memory (tests, previews)

use std::path::PathBuf;
use std::sync::Mutex;

use crate::backup::{export_wallet, import_wallet};
use crate::error::{Error, Result};
use crate::wallet::Wallet;

mod local;

pub use local::LocalStore;

/// Trait for wallet storage backends
pub trait WalletStore: Send + Sync {
    /// Where the wallet lives (path, URL, ...), for display
    fn location(&self) -> String;

    /// Load the wallet; a store with nothing saved yields an empty wallet
    fn load(&self) -> Result<Wallet>;

    /// Save the whole wallet, replacing what was stored
    fn save(&self, wallet: &Wallet) -> Result<()>;

    /// Load, apply a change, and save if the change succeeded
    fn modify<T, F>(&self, change: F) -> Result<T>
    where
        Self: Sized,
        F: FnOnce(&mut Wallet) -> Result<T>,
    {
        let mut wallet = self.load()?;
        let output = change(&mut wallet)?;
        self.save(&wallet)?;
        Ok(output)
    }
}

/// In-memory store holding the encoded wallet document
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a wallet
    pub fn with_wallet(wallet: &Wallet) -> Result<Self> {
        let store = Self::new();
        store.save(wallet)?;
        Ok(store)
    }
}

impl WalletStore for MemoryStore {
    fn location(&self) -> String {
        "memory://wallet".to_string()
    }

    fn load(&self) -> Result<Wallet> {
        let document = self
            .document
            .lock()
            .map_err(|_| Error::InvalidData("Wallet store lock poisoned".into()))?;
        match document.as_deref() {
            Some(text) => import_wallet(text),
            None => Ok(Wallet::new()),
        }
    }

    fn save(&self, wallet: &Wallet) -> Result<()> {
        let text = export_wallet(wallet)?;
        let mut document = self
            .document
            .lock()
            .map_err(|_| Error::InvalidData("Wallet store lock poisoned".into()))?;
        *document = Some(text);
        Ok(())
    }
}

/// Default wallet file location
pub fn default_wallet_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cardwise")
        .join("wallet.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Reward;
    use crate::test_utils::sample_card;

    #[test]
    fn test_memory_store_starts_empty() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut wallet = Wallet::new();
        wallet
            .add(sample_card("Daily", vec![Reward::new("General", "2%", "")]))
            .unwrap();

        let store = MemoryStore::with_wallet(&wallet).unwrap();
        assert_eq!(store.load().unwrap(), wallet);
    }

    #[test]
    fn test_modify_saves_on_success_only() {
        let store = MemoryStore::new();
        store
            .modify(|wallet| wallet.add(sample_card("Daily", vec![])))
            .unwrap();
        assert_eq!(store.load().unwrap().len(), 1);

        let result: Result<()> = store.modify(|wallet| {
            let id = wallet.cards()[0].id.clone();
            wallet.remove(&id);
            Err(Error::Validation("abort".into()))
        });
        assert!(result.is_err());
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_default_wallet_path() {
        let path = default_wallet_path();
        assert!(path.ends_with("cardwise/wallet.json"));
    }
}
