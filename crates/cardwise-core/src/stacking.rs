//! Stacking-offer detection
//!
//! Looks for cashback portals mentioned in a recommendation's stacking text
//! and optimization steps, so the caller can show the matching affiliate
//! quick-actions. New portals are added as another [`VendorPattern`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::RecommendationResult;

/// Cashback portals with a quick-action link
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StackingVendor {
    Rakuten,
    #[serde(rename = "PAYPAL")]
    PayPal,
    CapitalOne,
}

impl StackingVendor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rakuten => "RAKUTEN",
            Self::PayPal => "PAYPAL",
            Self::CapitalOne => "CAPITAL_ONE",
        }
    }

    /// Button label for the quick-action
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rakuten => "Open Rakuten",
            Self::PayPal => "PayPal Offers",
            Self::CapitalOne => "Capital One Shopping",
        }
    }

    /// Fixed affiliate link for the quick-action
    pub fn affiliate_url(&self) -> &'static str {
        match self {
            Self::Rakuten => "https://www.rakuten.com/",
            Self::PayPal => "https://www.paypal.com/us/digital-wallet/manage-money/shopping",
            Self::CapitalOne => "https://capitaloneshopping.com/",
        }
    }
}

impl std::fmt::Display for StackingVendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Phrases that identify a vendor in free text (matched case-insensitively)
#[derive(Debug, Clone)]
pub struct VendorPattern {
    pub vendor: StackingVendor,
    pub phrases: Vec<String>,
}

impl VendorPattern {
    pub fn new(vendor: StackingVendor, phrases: &[&str]) -> Self {
        Self {
            vendor,
            phrases: phrases.iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.phrases.iter().any(|p| lowered.contains(p.as_str()))
    }
}

/// Substring classifier over a list of vendor patterns
#[derive(Debug, Clone)]
pub struct OfferDetector {
    patterns: Vec<VendorPattern>,
}

impl Default for OfferDetector {
    fn default() -> Self {
        Self::new(vec![
            VendorPattern::new(StackingVendor::Rakuten, &["rakuten"]),
            VendorPattern::new(StackingVendor::PayPal, &["paypal"]),
            VendorPattern::new(StackingVendor::CapitalOne, &["capital one"]),
        ])
    }
}

impl OfferDetector {
    pub fn new(patterns: Vec<VendorPattern>) -> Self {
        Self { patterns }
    }

    /// Vendors mentioned anywhere in the stacking info or optimization steps
    pub fn detect(&self, result: &RecommendationResult) -> BTreeSet<StackingVendor> {
        let texts = result.stacking_info.iter().chain(
            result
                .optimization_analysis
                .iter()
                .flat_map(|analysis| analysis.steps_to_maximize.iter()),
        );

        let mut found = BTreeSet::new();
        for text in texts {
            let lowered = text.to_lowercase();
            for pattern in &self.patterns {
                if pattern.matches(&lowered) {
                    found.insert(pattern.vendor);
                }
            }
        }
        found
    }
}

/// Detect offers with the built-in vendor list
pub fn detect_offers(result: &RecommendationResult) -> BTreeSet<StackingVendor> {
    OfferDetector::default().detect(result)
}
