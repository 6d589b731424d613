//! Cardwise Core Library
//!
//! Shared functionality for the Cardwise credit card wallet assistant:
//! - Card wallet model and its invariants
//! - Reward rate and purchase amount parsing
//! - Recommendation reconciliation and stacking-offer detection
//! - Backup/restore codec for the whole wallet
//! - Pluggable wallet stores (local file, in-memory)
//! - Pluggable AI backends (OpenAI-compatible servers, mock)
//! - Prompt library with on-disk overrides
//! - Layered configuration (defaults, TOML file, environment)

pub mod advisor;
pub mod ai;
pub mod backup;
pub mod config;
pub mod error;
pub mod models;
pub mod prompts;
pub mod reconcile;
pub mod stacking;
pub mod store;
pub mod valuation;
pub mod wallet;

/// Test utilities including a mock OpenAI-compatible server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advisor::{Advice, CardAdvisor, CardEdit};
pub use ai::{AIBackend, AIClient, CardDetails, MockBackend, OpenAICompatibleBackend};
pub use backup::{export_wallet, import_wallet, BackupDocument, BACKUP_VERSION};
pub use config::{AiConfig, Config, WalletConfig};
pub use error::{Error, Result};
pub use models::{
    Benefit, Card, CardDocument, CardNetwork, CardSummary, DocumentKind, DraftCard,
    MarketRecommendation, PurchaseContext, RecommendationResult, Reward, GENERIC_CARD_ID,
};
pub use prompts::{PromptId, PromptLibrary};
pub use reconcile::{reconcile, ReconciledRecommendation, HIGH_VALUE_PURCHASE_THRESHOLD};
pub use stacking::{detect_offers, OfferDetector, StackingVendor};
pub use store::{LocalStore, MemoryStore, WalletStore};
pub use valuation::{estimate_dollar_value, extract_percentage, parse_amount};
pub use wallet::Wallet;
