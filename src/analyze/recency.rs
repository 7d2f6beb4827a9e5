// src/analyze/recency.rs
//! Linear recency decay over the configured age window.

use chrono::{DateTime, Utc};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Fractional age in days; negative for future-dated entries.
pub fn age_days(published: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - published).num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY
}

/// `1 - age/max_age`, clamped to `[0,1]`.
///
/// Future-dated entries score `1.0`; a missing timestamp or a zero window scores `0.0`.
pub fn recency_score(
    published: Option<DateTime<Utc>>,
    max_age_days: u32,
    now: DateTime<Utc>,
) -> f64 {
    let Some(published) = published else {
        return 0.0;
    };
    if max_age_days == 0 {
        return 0.0;
    }
    let age = age_days(published, now);
    if age <= 0.0 {
        return 1.0;
    }
    (1.0 - age / f64::from(max_age_days)).clamp(0.0, 1.0)
}
