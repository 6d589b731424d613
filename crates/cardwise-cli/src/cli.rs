//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Cardwise - Pick the right credit card for every purchase
#[derive(Parser)]
#[command(name = "cardwise")]
#[command(about = "Credit card wallet assistant", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Wallet file (defaults to the config file setting, then the data dir)
    #[arg(long, global = true)]
    pub wallet: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage wallet cards (lists cards when no action is given)
    Cards {
        #[command(subcommand)]
        action: Option<CardsAction>,
    },

    /// Recommend the wallet card to use for a purchase
    Recommend(PurchaseArgs),

    /// Suggest a card outside the wallet that would earn more
    BetterCard(PurchaseArgs),

    /// Estimate the dollar value of a reward rate on an amount
    Estimate {
        /// Reward rate text (e.g. "5% cashback")
        #[arg(short, long)]
        rate: String,

        /// Purchase amount (e.g. "$1,200")
        #[arg(short, long)]
        amount: String,
    },

    /// Export the wallet to a backup file
    Export {
        /// Output file (default: cardwise-backup-<date>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the wallet with the contents of a backup file
    ///
    /// WARNING: every card currently in the wallet is removed.
    Import {
        /// Backup file to import
        file: PathBuf,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show wallet location, card count and AI backend status
    Status,

    /// Manage AI prompts (list, show, path)
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },
}

/// What is being bought
#[derive(Args, Debug, Clone)]
pub struct PurchaseArgs {
    /// Item or purchase description
    #[arg(short, long)]
    pub item: String,

    /// Merchant or store
    #[arg(short, long)]
    pub merchant: Option<String>,

    /// Purchase amount in dollars
    #[arg(short, long)]
    pub amount: Option<String>,

    /// Purchase is made online
    #[arg(long)]
    pub online: bool,
}

#[derive(Subcommand)]
pub enum CardsAction {
    /// List cards
    List,

    /// Show every detail of a card
    Show {
        /// Card ID
        id: String,
    },

    /// Add a card by hand
    Add {
        /// Issuing bank
        #[arg(long)]
        bank: String,

        /// Product name (e.g. "Sapphire Preferred")
        #[arg(long)]
        product: String,

        /// Network: visa, mastercard, amex, discover, other
        #[arg(long)]
        network: Option<String>,

        /// Card color (hex)
        #[arg(long)]
        color: Option<String>,

        /// Cardholder name
        #[arg(long)]
        holder: String,

        /// Nickname shown in lists
        #[arg(long)]
        nickname: String,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,

        /// Reward as CATEGORY=RATE[=DESCRIPTION] (repeatable)
        #[arg(long = "reward")]
        rewards: Vec<String>,

        /// Benefit as TITLE=DESCRIPTION (repeatable)
        #[arg(long = "benefit")]
        benefits: Vec<String>,
    },

    /// Look a card up with the AI backend and add it
    Lookup {
        /// Card description (e.g. "Chase Sapphire Preferred")
        query: String,

        /// Cardholder name
        #[arg(long)]
        holder: String,

        /// Nickname shown in lists
        #[arg(long)]
        nickname: String,
    },

    /// Edit personal details or attach documents
    Edit {
        /// Card ID
        id: String,

        /// New cardholder name
        #[arg(long)]
        holder: Option<String>,

        /// New nickname
        #[arg(long)]
        nickname: Option<String>,

        /// New notes (empty string clears them)
        #[arg(long)]
        notes: Option<String>,

        /// File to attach (repeatable; .pdf files are stored as PDF, others as text)
        #[arg(long = "attach")]
        attachments: Vec<PathBuf>,
    },

    /// Fetch current rewards and benefits for a card
    Refresh {
        /// Card ID
        id: String,
    },

    /// Remove a card
    Remove {
        /// Card ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all prompts and their override status
    List,

    /// Show the template of a prompt
    Show {
        /// Prompt ID (e.g. recommend_card)
        prompt_id: String,
    },

    /// Show the override directory path
    Path,
}

impl From<PurchaseArgs> for cardwise_core::PurchaseContext {
    fn from(args: PurchaseArgs) -> Self {
        Self {
            item: args.item,
            merchant: args.merchant,
            amount: args.amount,
            online: args.online,
        }
    }
}
