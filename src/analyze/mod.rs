// src/analyze/mod.rs
//! Per-entry signals and their weighted aggregation.

pub mod keywords;
pub mod recency;
pub mod scoring;
pub mod weights;

pub use crate::analyze::keywords::{keyword_score, KeywordSet};
pub use crate::analyze::recency::recency_score;
pub use crate::analyze::scoring::{score_budget, ScoreInputs, Scorer};
pub use crate::analyze::weights::ScoreWeights;
