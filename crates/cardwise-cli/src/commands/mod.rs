//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `backup` - Wallet export and import
//! - `cards` - Card management (list, show, add, lookup, edit, refresh, remove)
//! - `core` - Shared utilities (config loading, advisor setup, confirmation)
//! - `prompts` - Prompt library management commands
//! - `recommend` - Recommendation commands (recommend, better-card, estimate)
//! - `status` - Wallet and AI backend status

pub mod backup;
pub mod cards;
pub mod core;
pub mod prompts;
pub mod recommend;
pub mod status;

// Re-export command functions for main.rs
pub use backup::*;
pub use cards::*;
pub use self::core::*;
pub use prompts::*;
pub use recommend::*;
pub use status::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
