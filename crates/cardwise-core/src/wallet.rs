//! In-memory card wallet
//!
//! Holds the user's cards in insertion order and enforces the wallet
//! invariants: unique ids, required holder name and nickname, the reserved
//! generic id never stored, and documents that are only ever appended.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Benefit, Card, CardDocument, CardSummary, Reward, GENERIC_CARD_ID};

/// The user's collection of cards
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wallet {
    cards: Vec<Card>,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a wallet from stored cards
    ///
    /// Only identity is checked here (unique, non-reserved ids) so that older
    /// documents with incomplete cards still load.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self> {
        let mut wallet = Self::new();
        for card in cards {
            check_identity(&card)?;
            if wallet.find_by_id(&card.id).is_some() {
                return Err(Error::Validation(format!("Duplicate card id: {}", card.id)));
            }
            wallet.cards.push(card);
        }
        Ok(wallet)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Add a complete card
    pub fn add(&mut self, card: Card) -> Result<()> {
        check_identity(&card)?;
        card.validate()?;
        if self.find_by_id(&card.id).is_some() {
            return Err(Error::Validation(format!(
                "Card {} is already in the wallet",
                card.id
            )));
        }
        debug!(id = %card.id, name = %card.display_name(), "Adding card");
        self.cards.push(card);
        Ok(())
    }

    /// Replace a card's fields, keeping every previously attached document
    ///
    /// Incoming documents whose ids are not already present are appended.
    pub fn update(&mut self, mut card: Card) -> Result<&Card> {
        check_identity(&card)?;
        card.validate()?;

        let existing = self
            .cards
            .iter_mut()
            .find(|c| c.id == card.id)
            .ok_or_else(|| Error::NotFound(format!("Card {}", card.id)))?;

        let mut documents = std::mem::take(&mut existing.documents);
        for doc in std::mem::take(&mut card.documents) {
            if !documents.iter().any(|d| d.id == doc.id) {
                documents.push(doc);
            }
        }
        card.documents = documents;
        *existing = card;

        debug!(id = %existing.id, documents = existing.documents.len(), "Updated card");
        Ok(existing)
    }

    /// Remove a card; removing an unknown id is a no-op
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.cards.len();
        self.cards.retain(|c| c.id != id);
        before != self.cards.len()
    }

    /// Overwrite rewards and benefits with freshly fetched ones
    pub fn refresh(
        &mut self,
        id: &str,
        rewards: Vec<Reward>,
        benefits: Vec<Benefit>,
        refreshed_at: DateTime<Utc>,
    ) -> Result<&Card> {
        let card = self
            .cards
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::NotFound(format!("Card {}", id)))?;
        card.rewards = rewards;
        card.benefits = benefits;
        card.last_refreshed = refreshed_at;
        Ok(card)
    }

    /// Append a document to a card
    pub fn attach_document(&mut self, id: &str, document: CardDocument) -> Result<()> {
        let card = self
            .cards
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::NotFound(format!("Card {}", id)))?;
        card.documents.push(document);
        Ok(())
    }

    /// Summaries for the AI service (no notes, no documents)
    pub fn summarize(&self) -> Vec<CardSummary> {
        self.cards.iter().map(Card::summary).collect()
    }

    /// Summaries to recommend from; the generic card when the wallet is empty
    pub fn recommendation_candidates(&self) -> Vec<CardSummary> {
        if self.cards.is_empty() {
            vec![Card::generic().summary()]
        } else {
            self.summarize()
        }
    }

    /// Replace every card with another wallet's cards
    ///
    /// This is a full overwrite, not a merge: cards missing from `other` are
    /// gone afterwards.
    pub fn replace_all(&mut self, other: Wallet) {
        self.cards = other.cards;
    }
}

fn check_identity(card: &Card) -> Result<()> {
    if card.id.trim().is_empty() {
        return Err(Error::Validation("Card id is required".into()));
    }
    if card.id == GENERIC_CARD_ID {
        return Err(Error::Validation(format!(
            "Card id {} is reserved",
            GENERIC_CARD_ID
        )));
    }
    Ok(())
}
