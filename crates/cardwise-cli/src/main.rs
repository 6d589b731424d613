//! Cardwise CLI - Credit card wallet assistant
//!
//! Usage:
//!   cardwise cards add --bank Chase --product "Freedom Flex" --holder "Sam" --nickname Daily
//!   cardwise recommend --item "Groceries" --amount 120
//!   cardwise export                 Write cardwise-backup-<date>.json
//!   cardwise import backup.json     Replace the wallet with a backup

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    // Commands that never touch the wallet
    match &cli.command {
        Commands::Estimate { rate, amount } => return commands::cmd_estimate(rate, amount),
        Commands::Prompts { action } => {
            return match action {
                None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
                Some(PromptsAction::Show { prompt_id }) => commands::cmd_prompts_show(prompt_id),
                Some(PromptsAction::Path) => commands::cmd_prompts_path(),
            }
        }
        _ => {}
    }

    let config = commands::load_config(cli.wallet.clone())?;
    let advisor = commands::open_advisor(&config);

    match cli.command {
        Commands::Cards { action } => match action {
            None | Some(CardsAction::List) => commands::cmd_cards_list(&advisor),
            Some(CardsAction::Show { id }) => commands::cmd_cards_show(&advisor, &id),
            Some(CardsAction::Add {
                bank,
                product,
                network,
                color,
                holder,
                nickname,
                notes,
                rewards,
                benefits,
            }) => commands::cmd_cards_add(
                &advisor,
                commands::NewCard {
                    bank,
                    product,
                    network,
                    color,
                    holder,
                    nickname,
                    notes,
                    rewards,
                    benefits,
                },
            ),
            Some(CardsAction::Lookup {
                query,
                holder,
                nickname,
            }) => commands::cmd_cards_lookup(&advisor, &query, &holder, &nickname).await,
            Some(CardsAction::Edit {
                id,
                holder,
                nickname,
                notes,
                attachments,
            }) => commands::cmd_cards_edit(&advisor, &id, holder, nickname, notes, &attachments),
            Some(CardsAction::Refresh { id }) => commands::cmd_cards_refresh(&advisor, &id).await,
            Some(CardsAction::Remove { id }) => commands::cmd_cards_remove(&advisor, &id),
        },
        Commands::Recommend(purchase) => {
            commands::cmd_recommend(&advisor, &purchase.into()).await
        }
        Commands::BetterCard(purchase) => {
            commands::cmd_better_card(&advisor, &purchase.into()).await
        }
        Commands::Export { output } => commands::cmd_export(&advisor, output).map(|_| ()),
        Commands::Import { file, yes } => commands::cmd_import(&advisor, &file, yes),
        Commands::Status => commands::cmd_status(&advisor).await,
        Commands::Estimate { .. } | Commands::Prompts { .. } => Ok(()),
    }
}
