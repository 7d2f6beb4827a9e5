// src/rank.rs
//! Stable descending ordering by score, truncated to `top_n`.

use std::fmt;

use serde::Serialize;

use crate::entry::Entry;

/// Sort by score (highest first, ties keep input order) and keep `top_n`.
pub fn rank(mut entries: Vec<Entry>, top_n: usize) -> Vec<Entry> {
    entries.sort_by(|a, b| b.score.total_cmp(&a.score));
    entries.truncate(top_n);
    entries
}

/// Display-only bucket derived from a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum PriorityBand {
    Low,
    Medium,
    High,
}

impl PriorityBand {
    pub const HIGH_MIN: f64 = 0.60;
    pub const MEDIUM_MIN: f64 = 0.40;

    pub fn from_score(score: f64) -> Self {
        if score >= Self::HIGH_MIN {
            PriorityBand::High
        } else if score >= Self::MEDIUM_MIN {
            PriorityBand::Medium
        } else {
            PriorityBand::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriorityBand::High => "High",
            PriorityBand::Medium => "Medium",
            PriorityBand::Low => "Low",
        }
    }
}

impl fmt::Display for PriorityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
