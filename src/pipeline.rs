// src/pipeline.rs
//! End-to-end run: filter → dedup → score → rank.

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analyze::Scorer;
use crate::config::Config;
use crate::dedup::deduplicate;
use crate::entry::{Entry, RawEntry};
use crate::filter::{FilterDiagnostics, FilterStage};
use crate::rank::rank;

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("pipeline_entries_fetched_total", "Raw entries handed to the pipeline.");
        describe_counter!(
            "pipeline_entries_selected_total",
            "Entries left after ranking and truncation."
        );
        describe_counter!("filter_dropped_age_total", "Entries older than the age window.");
        describe_counter!(
            "filter_dropped_invalid_date_total",
            "Entries without a resolvable publish date."
        );
        describe_counter!(
            "filter_dropped_region_total",
            "Entries dropped by the strict region filter."
        );
        describe_counter!(
            "filter_region_matched_total",
            "Entries matching a configured region."
        );
        describe_counter!(
            "filter_region_unmatched_total",
            "Entries matching no configured region."
        );
        describe_counter!(
            "filter_strict_region_fallback_total",
            "Runs where strict region filtering fell back to the unmatched set."
        );
        describe_counter!("dedup_removed_total", "Entries removed as duplicates.");
        describe_gauge!("pipeline_last_run_ts", "Unix timestamp of the last pipeline run.");
    });
}

/// Per-run counters handed to the renderer.
///
/// `filtered`, `deduplicated` and `selected` are the number of entries left
/// after the filter, dedup and rank stages respectively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub fetched: u64,
    pub filtered: u64,
    pub deduplicated: u64,
    pub selected: u64,
    pub dropped_age: u64,
    pub dropped_invalid_date: u64,
    pub dropped_region: u64,
    pub region_matched: u64,
    pub region_unmatched: u64,
    pub strict_region_fallback: u64,
}

impl RunMetrics {
    fn with_diagnostics(mut self, d: &FilterDiagnostics) -> Self {
        self.dropped_age = d.dropped_age;
        self.dropped_invalid_date = d.dropped_invalid_date;
        self.dropped_region = d.dropped_region;
        self.region_matched = d.region_matched;
        self.region_unmatched = d.region_unmatched;
        self.strict_region_fallback = d.strict_region_fallback;
        self
    }
}

/// Ranked entries plus the run's metrics, in output order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub generated_at: DateTime<Utc>,
    pub metrics: RunMetrics,
    pub entries: Vec<Entry>,
}

/// Run the whole pipeline against a fixed `now`.
pub fn run(raw: Vec<RawEntry>, config: &Config, now: DateTime<Utc>) -> PipelineOutput {
    ensure_metrics_described();

    let fetched = raw.len() as u64;
    let (kept, diag) = FilterStage::new(config).run(raw, now);
    let filtered = kept.len() as u64;

    let (mut unique, removed) = deduplicate(kept, config.content_dedup);
    let deduplicated = unique.len() as u64;

    let scorer = Scorer::new(config);
    for e in unique.iter_mut() {
        scorer.score_entry(e, now);
    }

    let entries = rank(unique, config.top_n);
    let metrics = RunMetrics {
        fetched,
        filtered,
        deduplicated,
        selected: entries.len() as u64,
        ..Default::default()
    }
    .with_diagnostics(&diag);

    record(&metrics, removed as u64, now);
    info!(
        target: "pipeline",
        fetched = metrics.fetched,
        filtered = metrics.filtered,
        deduplicated = metrics.deduplicated,
        selected = metrics.selected,
        dropped_age = metrics.dropped_age,
        dropped_invalid_date = metrics.dropped_invalid_date,
        dropped_region = metrics.dropped_region,
        strict_region_fallback = metrics.strict_region_fallback,
        "pipeline run complete"
    );

    PipelineOutput {
        generated_at: now,
        metrics,
        entries,
    }
}

/// [`run`] with the current wall-clock time.
pub fn run_now(raw: Vec<RawEntry>, config: &Config) -> PipelineOutput {
    run(raw, config, Utc::now())
}

fn record(m: &RunMetrics, dedup_removed: u64, now: DateTime<Utc>) {
    counter!("pipeline_entries_fetched_total").increment(m.fetched);
    counter!("pipeline_entries_selected_total").increment(m.selected);
    counter!("filter_dropped_age_total").increment(m.dropped_age);
    counter!("filter_dropped_invalid_date_total").increment(m.dropped_invalid_date);
    counter!("filter_dropped_region_total").increment(m.dropped_region);
    counter!("filter_region_matched_total").increment(m.region_matched);
    counter!("filter_region_unmatched_total").increment(m.region_unmatched);
    counter!("filter_strict_region_fallback_total").increment(m.strict_region_fallback);
    counter!("dedup_removed_total").increment(dedup_removed);
    gauge!("pipeline_last_run_ts").set(now.timestamp() as f64);
}
