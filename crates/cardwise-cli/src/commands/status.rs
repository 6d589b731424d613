//! Status command

use anyhow::Result;
use cardwise_core::config::default_config_path;
use cardwise_core::{AIBackend, CardAdvisor, WalletStore};

pub async fn cmd_status<S: WalletStore>(advisor: &CardAdvisor<S>) -> Result<()> {
    println!();
    println!("📊 Cardwise Status");
    println!("   ─────────────────────────────────────────────────────────────");

    let config_path = default_config_path();
    match config_path.as_deref() {
        Some(path) if path.exists() => println!("   Config: {}", path.display()),
        Some(path) => println!("   Config: {} (not present, using defaults)", path.display()),
        None => println!("   Config: (no config directory on this platform)"),
    }

    println!("   Wallet: {}", advisor.store().location());

    match advisor.store().load() {
        Ok(wallet) if wallet.is_empty() => println!("   Cards: 0 (wallet is empty)"),
        Ok(wallet) => {
            println!("   Cards: {}", wallet.len());
            let documents: usize = wallet.cards().iter().map(|c| c.documents.len()).sum();
            if documents > 0 {
                println!("   Documents: {}", documents);
            }
        }
        Err(e) => println!("   ❌ Error loading wallet: {}", e),
    }

    println!();
    match advisor.ai() {
        Some(ai) => {
            println!("   AI host: {}", ai.host());
            println!("   AI model: {}", ai.model());
            if ai.health_check().await {
                println!("   ✅ AI backend reachable");
            } else {
                println!("   ❌ AI backend not reachable");
            }
        }
        None => {
            println!("   ⚠️  AI: not configured");
            println!("      Set OPENAI_COMPATIBLE_HOST (and OPENAI_COMPATIBLE_API_KEY)");
            println!("      or add an [ai] section to the config file");
        }
    }

    println!();
    Ok(())
}
