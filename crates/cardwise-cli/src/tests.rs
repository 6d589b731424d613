//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::fs;

use cardwise_core::{AIClient, CardAdvisor, LocalStore, MemoryStore, PurchaseContext, WalletStore};
use tempfile::TempDir;

use crate::commands::{self, truncate, NewCard};

fn setup_advisor(dir: &TempDir) -> CardAdvisor<LocalStore> {
    CardAdvisor::new(
        Some(AIClient::mock()),
        LocalStore::new(dir.path().join("wallet.json")),
    )
}

fn new_card(nickname: &str) -> NewCard {
    NewCard {
        bank: "Chase".into(),
        product: "Freedom Flex".into(),
        network: Some("visa".into()),
        holder: "Sam Lee".into(),
        nickname: nickname.into(),
        rewards: vec!["Dining=3%".into(), "Rotating=5%=Quarterly categories".into()],
        benefits: vec!["Cell phone protection=Up to $800 per claim".into()],
        ..Default::default()
    }
}

fn only_card_id(advisor: &CardAdvisor<LocalStore>) -> String {
    let wallet = advisor.store().load().unwrap();
    assert_eq!(wallet.len(), 1);
    wallet.cards()[0].id.clone()
}

// ========== Cards Command Tests ==========

#[test]
fn test_cmd_cards_list_empty() {
    let dir = TempDir::new().unwrap();
    let advisor = setup_advisor(&dir);
    assert!(commands::cmd_cards_list(&advisor).is_ok());
}

#[test]
fn test_cmd_cards_add() {
    let dir = TempDir::new().unwrap();
    let advisor = setup_advisor(&dir);

    commands::cmd_cards_add(&advisor, new_card("Dining")).unwrap();

    let wallet = advisor.store().load().unwrap();
    let card = &wallet.cards()[0];
    assert_eq!(card.network.as_str(), "VISA");
    assert_eq!(card.rewards.len(), 2);
    assert_eq!(card.rewards[1].description, "Quarterly categories");
    assert_eq!(card.benefits[0].title, "Cell phone protection");

    assert!(commands::cmd_cards_list(&advisor).is_ok());
    assert!(commands::cmd_cards_show(&advisor, &card.id).is_ok());
}

#[test]
fn test_cmd_cards_add_requires_nickname() {
    let dir = TempDir::new().unwrap();
    let advisor = setup_advisor(&dir);

    let result = commands::cmd_cards_add(&advisor, new_card("  "));
    assert!(result.is_err());
    assert!(advisor.store().load().unwrap().is_empty());
}

#[test]
fn test_cmd_cards_add_bad_network() {
    let dir = TempDir::new().unwrap();
    let advisor = setup_advisor(&dir);

    let mut card = new_card("Daily");
    card.network = Some("diners".into());
    assert!(commands::cmd_cards_add(&advisor, card).is_err());
}

#[test]
fn test_cmd_cards_show_missing() {
    let dir = TempDir::new().unwrap();
    let advisor = setup_advisor(&dir);
    let result = commands::cmd_cards_show(&advisor, "nope");
    assert!(result.unwrap_err().to_string().contains("not found"));
}

#[test]
fn test_cmd_cards_edit_attaches_documents() {
    let dir = TempDir::new().unwrap();
    let advisor = setup_advisor(&dir);
    commands::cmd_cards_add(&advisor, new_card("Daily")).unwrap();
    let id = only_card_id(&advisor);

    let pdf = dir.path().join("Guide.PDF");
    let txt = dir.path().join("notes.md");
    fs::write(&pdf, b"%PDF-1.4").unwrap();
    fs::write(&txt, "remember the bonus").unwrap();

    commands::cmd_cards_edit(
        &advisor,
        &id,
        None,
        Some("Everyday".into()),
        Some("Keep in the car".into()),
        &[pdf, txt],
    )
    .unwrap();

    let wallet = advisor.store().load().unwrap();
    let card = wallet.find_by_id(&id).unwrap();
    assert_eq!(card.nickname, "Everyday");
    assert_eq!(card.notes.as_deref(), Some("Keep in the car"));
    assert_eq!(card.documents.len(), 2);
    assert_eq!(card.documents[0].kind.as_str(), "pdf");
    assert_eq!(card.documents[1].kind.as_str(), "text");
    assert_eq!(card.documents[0].content, b"%PDF-1.4");
}

#[test]
fn test_cmd_cards_edit_missing_attachment() {
    let dir = TempDir::new().unwrap();
    let advisor = setup_advisor(&dir);
    commands::cmd_cards_add(&advisor, new_card("Daily")).unwrap();
    let id = only_card_id(&advisor);

    let missing = dir.path().join("missing.pdf");
    let result = commands::cmd_cards_edit(&advisor, &id, None, None, None, &[missing]);
    assert!(result.is_err());
}

#[test]
fn test_cmd_cards_remove() {
    let dir = TempDir::new().unwrap();
    let advisor = setup_advisor(&dir);
    commands::cmd_cards_add(&advisor, new_card("Daily")).unwrap();
    let id = only_card_id(&advisor);

    assert!(commands::cmd_cards_remove(&advisor, &id).is_ok());
    assert!(advisor.store().load().unwrap().is_empty());

    // Removing again is not an error
    assert!(commands::cmd_cards_remove(&advisor, &id).is_ok());
}

#[tokio::test]
async fn test_cmd_cards_lookup_and_refresh() {
    let dir = TempDir::new().unwrap();
    let advisor = setup_advisor(&dir);

    commands::cmd_cards_lookup(&advisor, "Amex Gold", "Sam Lee", "Food")
        .await
        .unwrap();
    let id = only_card_id(&advisor);

    commands::cmd_cards_refresh(&advisor, &id).await.unwrap();
    assert!(commands::cmd_cards_refresh(&advisor, "missing").await.is_err());
}

// ========== Recommendation Command Tests ==========

#[tokio::test]
async fn test_cmd_recommend() {
    let dir = TempDir::new().unwrap();
    let advisor = setup_advisor(&dir);
    commands::cmd_cards_add(&advisor, new_card("Dining")).unwrap();

    let purchase = PurchaseContext {
        item: "Dinner".into(),
        merchant: Some("Bistro".into()),
        amount: Some("$80".into()),
        online: true,
    };
    assert!(commands::cmd_recommend(&advisor, &purchase).await.is_ok());
    assert!(commands::cmd_better_card(&advisor, &purchase).await.is_ok());
}

#[tokio::test]
async fn test_cmd_recommend_without_ai() {
    let dir = TempDir::new().unwrap();
    let advisor = CardAdvisor::new(None, LocalStore::new(dir.path().join("wallet.json")));

    let purchase = PurchaseContext {
        item: "Dinner".into(),
        ..Default::default()
    };
    let err = commands::cmd_recommend(&advisor, &purchase)
        .await
        .unwrap_err();
    assert!(format!("{:#}", err).contains("No AI backend configured"));
}

#[test]
fn test_cmd_estimate() {
    assert!(commands::cmd_estimate("5% cashback", "$1,200").is_ok());
    assert!(commands::cmd_estimate("3x points", "100").is_ok());
}

// ========== Backup Command Tests ==========

#[test]
fn test_cmd_export_and_import() {
    let dir = TempDir::new().unwrap();
    let advisor = setup_advisor(&dir);
    commands::cmd_cards_add(&advisor, new_card("One")).unwrap();
    commands::cmd_cards_add(&advisor, new_card("Two")).unwrap();

    let output = dir.path().join("backup.json");
    let written = commands::cmd_export(&advisor, Some(output.clone())).unwrap();
    assert_eq!(written, output);

    let other_dir = TempDir::new().unwrap();
    let other = setup_advisor(&other_dir);
    commands::cmd_cards_add(&other, new_card("Old")).unwrap();

    commands::cmd_import(&other, &output, true).unwrap();
    let wallet = other.store().load().unwrap();
    let names: Vec<&str> = wallet.cards().iter().map(|c| c.nickname.as_str()).collect();
    assert_eq!(names, vec!["One", "Two"]);
}

#[test]
fn test_cmd_export_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let advisor = setup_advisor(&dir);

    let output = dir.path().join("existing.json");
    fs::write(&output, "keep me").unwrap();

    let result = commands::cmd_export(&advisor, Some(output.clone()));
    assert!(result.unwrap_err().to_string().contains("already exists"));
    assert_eq!(fs::read_to_string(&output).unwrap(), "keep me");
}

#[test]
fn test_cmd_import_over_corrupt_wallet() {
    let dir = TempDir::new().unwrap();
    let source = setup_advisor(&dir);
    commands::cmd_cards_add(&source, new_card("Saved")).unwrap();
    let output = dir.path().join("backup.json");
    commands::cmd_export(&source, Some(output.clone())).unwrap();

    let other_dir = TempDir::new().unwrap();
    fs::write(other_dir.path().join("wallet.json"), "{corrupt").unwrap();
    let damaged = setup_advisor(&other_dir);

    commands::cmd_import(&damaged, &output, true).unwrap();
    assert_eq!(damaged.store().load().unwrap().cards()[0].nickname, "Saved");
}

#[test]
fn test_cmd_import_invalid_file() {
    let dir = TempDir::new().unwrap();
    let advisor = setup_advisor(&dir);
    commands::cmd_cards_add(&advisor, new_card("Keep")).unwrap();

    let bad = dir.path().join("bad.json");
    fs::write(&bad, r#"{"version": 1, "cards": {}}"#).unwrap();

    assert!(commands::cmd_import(&advisor, &bad, true).is_err());
    assert_eq!(advisor.store().load().unwrap().len(), 1);

    let missing = dir.path().join("missing.json");
    assert!(commands::cmd_import(&advisor, &missing, true).is_err());
}

// ========== Status / Prompts Command Tests ==========

#[tokio::test]
async fn test_cmd_status() {
    let dir = TempDir::new().unwrap();
    let advisor = setup_advisor(&dir);
    assert!(commands::cmd_status(&advisor).await.is_ok());

    let no_ai = CardAdvisor::new(None, LocalStore::new(dir.path().join("wallet.json")));
    assert!(commands::cmd_status(&no_ai).await.is_ok());

    let in_memory = CardAdvisor::new(None, MemoryStore::new());
    assert!(commands::cmd_status(&in_memory).await.is_ok());
}

#[test]
fn test_cmd_prompts() {
    assert!(commands::cmd_prompts_list().is_ok());
    assert!(commands::cmd_prompts_show("recommend_card").is_ok());
    assert!(commands::cmd_prompts_show("unknown").is_ok());
}

#[test]
fn test_load_config_wallet_override() {
    let config = commands::load_config(Some("/tmp/override.json".into())).unwrap();
    assert_eq!(
        config.wallet_path(),
        std::path::PathBuf::from("/tmp/override.json")
    );
}

// ========== Parsing Helper Tests ==========

#[test]
fn test_parse_reward() {
    let reward = commands::parse_reward("Groceries = 6% = US supermarkets").unwrap();
    assert_eq!(reward.category, "Groceries");
    assert_eq!(reward.rate, "6%");
    assert_eq!(reward.description, "US supermarkets");

    let reward = commands::parse_reward("Travel=5x").unwrap();
    assert_eq!(reward.description, "");

    assert!(commands::parse_reward("Travel").is_err());
    assert!(commands::parse_reward("=5%").is_err());
}

#[test]
fn test_parse_benefit() {
    let benefit = commands::parse_benefit("Lounge access=Priority Pass").unwrap();
    assert_eq!(benefit.title, "Lounge access");
    assert!(commands::parse_benefit("No separator").is_err());
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a very long card name", 10), "a very ...");
    assert_eq!(truncate("ünïcödé-name", 6), "ünï...");
}
