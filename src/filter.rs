// src/filter.rs
//! Age cutoff and region annotation/exclusion, with per-run diagnostics.

use std::collections::BTreeSet;
use std::ops::AddAssign;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analyze::recency::age_days;
use crate::config::Config;
use crate::entry::{Entry, RawEntry};
use crate::ingest::parse_published;
use crate::regions::{flatten_region_labels, raw_label_match, RegionClassifier, RegionGroup};

/// Counters accumulated over one filter pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDiagnostics {
    pub dropped_age: u64,
    pub dropped_invalid_date: u64,
    pub dropped_region: u64,
    pub region_matched: u64,
    pub region_unmatched: u64,
    pub strict_region_fallback: u64,
}

impl FilterDiagnostics {
    /// Fold in partial counters from another worker.
    pub fn merge(&mut self, other: &FilterDiagnostics) {
        self.dropped_age += other.dropped_age;
        self.dropped_invalid_date += other.dropped_invalid_date;
        self.dropped_region += other.dropped_region;
        self.region_matched += other.region_matched;
        self.region_unmatched += other.region_unmatched;
        self.strict_region_fallback = self.strict_region_fallback.max(other.strict_region_fallback);
    }
}

impl AddAssign for FilterDiagnostics {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}

/// Outcome of the region check for a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionVerdict {
    /// No regions configured; nothing to check.
    Unconfigured,
    /// Canonical region groups found in the text.
    Groups(Vec<RegionGroup>),
    /// Only a literal configured label matched.
    RawLabel,
    Unmatched,
}

/// Config-derived state of the filter stage.
#[derive(Debug)]
pub struct FilterStage {
    max_age_days: u32,
    strict: bool,
    labels: Vec<String>,
    configured_groups: BTreeSet<RegionGroup>,
    classifier: RegionClassifier,
}

impl FilterStage {
    pub fn new(config: &Config) -> Self {
        let labels = flatten_region_labels(&config.regions);
        let classifier = RegionClassifier::new();
        let configured_groups = classifier.configured_groups(&labels);
        Self {
            max_age_days: config.max_age_days,
            strict: config.strict_region_filter,
            labels,
            configured_groups,
            classifier,
        }
    }

    pub fn regions_configured(&self) -> bool {
        !self.labels.is_empty()
    }

    pub fn region_verdict(&self, text: &str) -> RegionVerdict {
        if !self.regions_configured() {
            return RegionVerdict::Unconfigured;
        }
        let groups = self.classifier.matched_groups(text, &self.configured_groups);
        if !groups.is_empty() {
            return RegionVerdict::Groups(groups.into_iter().collect());
        }
        if raw_label_match(text, &self.labels) {
            RegionVerdict::RawLabel
        } else {
            RegionVerdict::Unmatched
        }
    }

    /// Filter `raw` entries against `now`.
    ///
    /// In strict mode, region-unmatched entries are set aside; if nothing else
    /// survives they are all reinstated and `strict_region_fallback` is set.
    pub fn run(&self, raw: Vec<RawEntry>, now: DateTime<Utc>) -> (Vec<Entry>, FilterDiagnostics) {
        let mut diag = FilterDiagnostics::default();
        let mut kept = Vec::with_capacity(raw.len());
        let mut strict_dropped = Vec::new();

        for r in raw {
            let Some(published) = r.published.as_deref().and_then(parse_published) else {
                diag.dropped_invalid_date += 1;
                debug!(target: "filter", raw = ?r.published, "dropped: invalid date");
                continue;
            };
            let mut entry = Entry::from_raw(r, published);

            if age_days(entry.published, now) > f64::from(self.max_age_days) {
                diag.dropped_age += 1;
                debug!(target: "filter", id = %entry.short_id(), "dropped: too old");
                continue;
            }

            match self.region_verdict(&entry.search_text()) {
                RegionVerdict::Unconfigured => {}
                RegionVerdict::Groups(groups) => {
                    diag.region_matched += 1;
                    entry.matched_regions = Some(groups);
                }
                RegionVerdict::RawLabel => {
                    diag.region_matched += 1;
                }
                RegionVerdict::Unmatched => {
                    diag.region_unmatched += 1;
                    if self.strict {
                        diag.dropped_region += 1;
                        debug!(target: "filter", id = %entry.short_id(), "set aside: region unmatched");
                        strict_dropped.push(entry);
                        continue;
                    }
                }
            }
            kept.push(entry);
        }

        if self.strict && kept.is_empty() && !strict_dropped.is_empty() {
            debug!(
                target: "filter",
                reinstated = strict_dropped.len(),
                "strict region filter left nothing; reinstating"
            );
            kept = strict_dropped;
            diag.dropped_region = 0;
            diag.strict_region_fallback = 1;
        }

        (kept, diag)
    }
}

/// One-shot form of [`FilterStage::run`].
pub fn filter_entries(
    raw: Vec<RawEntry>,
    config: &Config,
    now: DateTime<Utc>,
) -> (Vec<Entry>, FilterDiagnostics) {
    FilterStage::new(config).run(raw, now)
}
