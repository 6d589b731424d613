//! Wallet backup export/import
//!
//! A backup is one versioned JSON document:
//!
//! ```json
//! { "version": 1, "cards": [ ... ], "lastUpdated": "2024-01-15T10:30:00Z" }
//! ```
//!
//! Document bytes travel as base64 text, so a round trip reproduces them
//! exactly. Importing **replaces the whole wallet**; it never merges. A
//! failed import leaves the current wallet untouched.
//!
//! File naming: `cardwise-backup-YYYY-MM-DD.json`

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::models::Card;
use crate::wallet::Wallet;

/// Current backup document version
pub const BACKUP_VERSION: u32 = 1;

const BACKUP_PREFIX: &str = "cardwise-backup-";
const BACKUP_SUFFIX: &str = ".json";

/// The exported wallet document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub version: u32,
    pub cards: Vec<Card>,
    pub last_updated: DateTime<Utc>,
}

impl BackupDocument {
    /// Snapshot a wallet, stamped now
    pub fn from_wallet(wallet: &Wallet) -> Self {
        Self {
            version: BACKUP_VERSION,
            cards: wallet.cards().to_vec(),
            last_updated: Utc::now(),
        }
    }
}

/// Serialize the whole wallet; an empty wallet gives an empty `cards` array
pub fn export_wallet(wallet: &Wallet) -> Result<String> {
    let document = BackupDocument::from_wallet(wallet);
    let json = serde_json::to_string_pretty(&document)?;
    info!(cards = document.cards.len(), "Exported wallet backup");
    Ok(json)
}

/// Parse a backup into a new wallet
///
/// Only the presence of a `cards` array is required beyond the cards
/// themselves deserializing; the version number is informational.
pub fn import_wallet(text: &str) -> Result<Wallet> {
    let mut value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| Error::Import(format!("Backup is not valid JSON: {}", e)))?;

    if let Some(version) = value.get("version").and_then(|v| v.as_u64()) {
        if version != u64::from(BACKUP_VERSION) {
            warn!(version, expected = BACKUP_VERSION, "Importing backup with unexpected version");
        }
    }

    let cards = match value.get_mut("cards") {
        Some(cards) if cards.is_array() => cards.take(),
        Some(_) => return Err(Error::Import("Backup `cards` is not an array".into())),
        None => return Err(Error::Import("Backup has no `cards` array".into())),
    };

    let cards: Vec<Card> = serde_json::from_value(cards)
        .map_err(|e| Error::Import(format!("Invalid card in backup: {}", e)))?;

    Wallet::from_cards(cards).map_err(|e| Error::Import(e.to_string()))
}

impl Wallet {
    /// Replace this wallet with the contents of a backup
    ///
    /// Destructive: every current card is dropped, including its documents.
    /// On error nothing changes. Returns the number of cards restored.
    pub fn restore_from_backup(&mut self, text: &str) -> Result<usize> {
        let imported = import_wallet(text)?;
        let count = imported.len();
        self.replace_all(imported);
        info!(cards = count, "Restored wallet from backup");
        Ok(count)
    }
}

/// Backup filename for a date
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("{}{}{}", BACKUP_PREFIX, date.format("%Y-%m-%d"), BACKUP_SUFFIX)
}

/// Backup filename for today
pub fn generate_backup_name() -> String {
    backup_file_name(Utc::now().date_naive())
}

/// Parse the date out of a backup filename
pub fn parse_backup_date(name: &str) -> Option<NaiveDate> {
    let date = name
        .strip_prefix(BACKUP_PREFIX)?
        .strip_suffix(BACKUP_SUFFIX)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
