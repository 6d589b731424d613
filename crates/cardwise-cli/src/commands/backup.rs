//! Backup commands (export, import)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cardwise_core::backup::generate_backup_name;
use cardwise_core::{CardAdvisor, WalletStore};

use super::confirm;

/// Export the wallet to a backup file; returns the path written
pub fn cmd_export<S: WalletStore>(
    advisor: &CardAdvisor<S>,
    output: Option<PathBuf>,
) -> Result<PathBuf> {
    let path = output.unwrap_or_else(|| PathBuf::from(generate_backup_name()));

    if path.exists() {
        anyhow::bail!(
            "File already exists at {}.\nChoose another --output or move the file.",
            path.display()
        );
    }

    let json = advisor.export_backup().context("Failed to export wallet")?;
    fs::write(&path, &json).with_context(|| format!("Failed to write {}", path.display()))?;

    let cards = advisor.store().load().map(|w| w.len()).unwrap_or_default();
    println!("✅ Wallet exported to {}", path.display());
    println!("   Cards: {}", cards);
    println!("   Size: {} bytes", json.len());

    Ok(path)
}

/// Replace the wallet with a backup file
pub fn cmd_import<S: WalletStore>(advisor: &CardAdvisor<S>, file: &Path, yes: bool) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read backup file {}", file.display()))?;

    if !yes {
        println!(
            "⚠️  Importing replaces the whole wallet at {}",
            advisor.store().location()
        );
        match advisor.store().load() {
            Ok(current) if !current.is_empty() => println!(
                "   {} card(s) and their documents will be removed.",
                current.len()
            ),
            Ok(_) => {}
            Err(e) => println!("   Current wallet is unreadable ({}); it will be replaced.", e),
        }
        if !confirm("Continue?")? {
            println!("Cancelled");
            return Ok(());
        }
    }

    let count = advisor
        .import_backup(&text)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    println!("✅ Wallet restored from {}", file.display());
    println!("   Cards: {}", count);
    Ok(())
}
