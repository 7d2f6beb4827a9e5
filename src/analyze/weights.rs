// src/analyze/weights.rs
//! Signal weights. All defaulting of the `weights` config block happens here.
//!
//! Defaults: keyword 0.45, budget 0.25, recency 0.20, source 0.10, region 0.
//! When regions are configured and no explicit region weight is given, the region
//! weight activates at 0.10 and the same amount is taken from the keyword weight
//! (floored at 0).

use serde::Serialize;

use crate::config::WeightOverrides;

pub const DEFAULT_KEYWORD: f64 = 0.45;
pub const DEFAULT_BUDGET: f64 = 0.25;
pub const DEFAULT_RECENCY: f64 = 0.20;
pub const DEFAULT_SOURCE: f64 = 0.10;
pub const ACTIVATED_REGION: f64 = 0.10;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScoreWeights {
    pub keyword: f64,
    pub budget: f64,
    pub recency: f64,
    pub source: f64,
    pub region: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            keyword: DEFAULT_KEYWORD,
            budget: DEFAULT_BUDGET,
            recency: DEFAULT_RECENCY,
            source: DEFAULT_SOURCE,
            region: 0.0,
        }
    }
}

impl ScoreWeights {
    /// Effective weights for a run.
    pub fn resolve(overrides: Option<&WeightOverrides>, regions_configured: bool) -> Self {
        let d = Self::default();
        let o = overrides.copied().unwrap_or_default();
        let mut w = Self {
            keyword: o.keyword.unwrap_or(d.keyword),
            budget: o.budget.unwrap_or(d.budget),
            recency: o.recency.unwrap_or(d.recency),
            source: o.source.unwrap_or(d.source),
            region: o.region.unwrap_or(d.region),
        };
        if regions_configured && o.region.is_none() {
            w.region = ACTIVATED_REGION;
            w.keyword = (w.keyword - ACTIVATED_REGION).max(0.0);
        }
        w
    }

    pub fn total(&self) -> f64 {
        self.keyword + self.budget + self.recency + self.source + self.region
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn defaults_without_regions() {
        let w = ScoreWeights::resolve(None, false);
        assert_eq!(w, ScoreWeights::default());
        assert!(close(w.total(), 1.0));
    }

    #[test]
    fn region_weight_activates_from_keyword_share() {
        let w = ScoreWeights::resolve(None, true);
        assert!(close(w.region, 0.10));
        assert!(close(w.keyword, 0.35));
        assert!(close(w.total(), 1.0));
    }

    #[test]
    fn explicit_region_weight_is_respected() {
        let o = WeightOverrides {
            region: Some(0.0),
            ..Default::default()
        };
        let w = ScoreWeights::resolve(Some(&o), true);
        assert_eq!(w.region, 0.0);
        assert!(close(w.keyword, DEFAULT_KEYWORD));
    }

    #[test]
    fn activation_floors_keyword_at_zero() {
        let o = WeightOverrides {
            keyword: Some(0.05),
            ..Default::default()
        };
        let w = ScoreWeights::resolve(Some(&o), true);
        assert_eq!(w.keyword, 0.0);
        assert!(close(w.region, 0.10));
        assert!(close(w.budget, DEFAULT_BUDGET));
    }
}
