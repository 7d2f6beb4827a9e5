// src/analyze/scoring.rs
//! Weighted aggregation of the per-entry signals.
//!
//! Components, each in `[0,1]`:
//! - `keyword` : fraction of configured keywords present
//! - `budget`  : extracted amount relative to `min_budget`
//! - `recency` : linear decay over `max_age_days`
//! - `source`  : reputation weight of the source (clamped here)
//! - `region`  : 1.0 when any configured region group matched
//!
//! Final score = Σ(component·weight) / Σ(weight), or 0 when all weights are 0.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::analyze::keywords::KeywordSet;
use crate::analyze::recency::recency_score;
use crate::analyze::weights::ScoreWeights;
use crate::budget::extract_budget;
use crate::config::Config;
use crate::entry::Entry;
use crate::regions::{flatten_region_labels, RegionClassifier, RegionGroup};
use crate::source_weights::{apply_source_weighting, SourceWeights};

/// Normalized component scores for one entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ScoreInputs {
    pub keyword: f64,
    pub budget: f64,
    pub recency: f64,
    pub source: f64,
    pub region: f64,
}

impl ScoreInputs {
    /// Safe constructor with clamping.
    pub fn new(keyword: f64, budget: f64, recency: f64, source: f64, region: f64) -> Self {
        fn c(x: f64) -> f64 {
            if x.is_nan() {
                0.0
            } else {
                x.clamp(0.0, 1.0)
            }
        }
        Self {
            keyword: c(keyword),
            budget: c(budget),
            recency: c(recency),
            source: c(source),
            region: c(region),
        }
    }

    /// Weighted mean of the components.
    pub fn combine(&self, w: &ScoreWeights) -> f64 {
        let total = w.total();
        if total <= 0.0 {
            return 0.0;
        }
        let raw = self.keyword * w.keyword
            + self.budget * w.budget
            + self.recency * w.recency
            + self.source * w.source
            + self.region * w.region;
        (raw / total).clamp(0.0, 1.0)
    }
}

/// Budget component: 0 without an amount or below `min_budget`, 0.5 at
/// `min_budget`, rising linearly to 1.0 at twice `min_budget` (or `min_budget + 1`
/// when that is larger).
pub fn score_budget(amount: Option<f64>, min_budget: f64) -> f64 {
    let Some(amount) = amount else {
        return 0.0;
    };
    if !amount.is_finite() || amount < min_budget {
        return 0.0;
    }
    let upper = (min_budget * 2.0).max(min_budget + 1.0);
    (0.5 + 0.5 * (amount - min_budget) / (upper - min_budget)).clamp(0.0, 1.0)
}

/// Score aggregator holding everything derived from the config once per run.
#[derive(Debug)]
pub struct Scorer {
    keywords: KeywordSet,
    weights: ScoreWeights,
    min_budget: f64,
    max_age_days: u32,
    source_weights: SourceWeights,
    configured_groups: BTreeSet<RegionGroup>,
    classifier: RegionClassifier,
}

impl Scorer {
    pub fn new(config: &Config) -> Self {
        let labels = flatten_region_labels(&config.regions);
        let classifier = RegionClassifier::new();
        let configured_groups = classifier.configured_groups(&labels);
        Self {
            keywords: KeywordSet::new(&config.keywords),
            weights: ScoreWeights::resolve(config.weights.as_ref(), !labels.is_empty()),
            min_budget: config.min_budget,
            max_age_days: config.max_age_days,
            source_weights: config.source_weights.clone(),
            configured_groups,
            classifier,
        }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Compute the components for `entry`.
    ///
    /// Writes the extracted budget onto the entry and, when a region group
    /// matched, the sorted match set as `matched_regions`.
    pub fn inputs(&self, entry: &mut Entry, now: DateTime<Utc>) -> ScoreInputs {
        let text = entry.search_text();

        entry.budget = extract_budget(&text);
        let budget = score_budget(
            entry.budget.as_ref().and_then(|b| b.amount),
            self.min_budget,
        );

        let matched = self.classifier.matched_groups(&text, &self.configured_groups);
        let region = if matched.is_empty() {
            0.0
        } else {
            entry.matched_regions = Some(matched.into_iter().collect());
            1.0
        };

        ScoreInputs::new(
            self.keywords.score(&text),
            budget,
            recency_score(Some(entry.published), self.max_age_days, now),
            apply_source_weighting(&entry.source, &self.source_weights),
            region,
        )
    }

    /// Score `entry` in place and return the final score.
    pub fn score_entry(&self, entry: &mut Entry, now: DateTime<Utc>) -> f64 {
        let inputs = self.inputs(entry, now);
        let score = inputs.combine(&self.weights);
        entry.score = score;
        debug!(
            target: "pipeline",
            id = %entry.short_id(),
            keyword = inputs.keyword,
            budget = inputs.budget,
            recency = inputs.recency,
            source = inputs.source,
            region = inputs.region,
            score,
            "scored entry"
        );
        score
    }
}
