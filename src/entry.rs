// src/entry.rs
//! Procurement notice records as they move through the pipeline.
//!
//! `RawEntry` is what the feed-parsing collaborator hands over (publish date still
//! a raw string). The filter stage turns each surviving record into an `Entry`
//! with a resolved UTC timestamp; the scorer then fills the derived fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ingest::normalize_text;
use crate::regions::RegionGroup;

/// Currency reported for every extracted budget.
pub const BUDGET_CURRENCY: &str = "USD";

/// A record straight from a feed, before date normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub description: String,
    /// Raw publish date as found in the feed (RFC 3339, RFC 2822, ...).
    #[serde(default)]
    pub published: Option<String>,
    /// Raw source identifier, usually the feed URL.
    #[serde(default)]
    pub source: String,
    /// Display label for the source.
    #[serde(default)]
    pub source_name: String,
}

/// Monetary amount pulled from notice text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Absent when the text only signals a small / capped purchase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    pub currency: String,
    pub matched_text: String,
}

impl Budget {
    pub fn usd(amount: Option<f64>, matched_text: impl Into<String>) -> Self {
        Self {
            amount,
            currency: BUDGET_CURRENCY.to_string(),
            matched_text: matched_text.into(),
        }
    }
}

/// A normalized notice with a resolved timestamp. Derived fields are written by
/// the filter stage and the scorer; nothing touches an entry after ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub title: String,
    /// Identity key for deduplication.
    pub link: String,
    pub description: String,
    pub published: DateTime<Utc>,
    pub source: String,
    pub source_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<Budget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_regions: Option<Vec<RegionGroup>>,
    #[serde(default)]
    pub score: f64,
}

impl Entry {
    /// Promote a raw record once its publish date has been resolved.
    pub fn from_raw(raw: RawEntry, published: DateTime<Utc>) -> Self {
        Self {
            title: raw.title,
            link: raw.link,
            description: raw.description,
            published,
            source: raw.source,
            source_name: raw.source_name,
            budget: None,
            matched_regions: None,
            score: 0.0,
        }
    }

    /// Markup-free `title + " " + description`; the text every signal runs on.
    pub fn search_text(&self) -> String {
        normalize_text(&format!("{} {}", self.title, self.description))
    }

    /// Short anonymized id (`link|title`), safe to put in logs.
    pub fn short_id(&self) -> String {
        use sha2::{Digest, Sha256};
        let digest = Sha256::digest(format!("{}|{}", self.link, self.title).as_bytes());
        let mut out = String::with_capacity(12);
        for b in digest.iter().take(6) {
            use std::fmt::Write as _;
            let _ = write!(&mut out, "{:02x}", b);
        }
        out
    }
}
