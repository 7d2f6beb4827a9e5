//! # Source Weights
//!
//! Maps a source identifier (usually a feed URL) to a reputation weight using
//! the `source_weights` table from the config.
//!
//! - Lookup order: exact key → first configured pattern found in the source's
//!   domain (config order) → `"default"` entry → `0.5`.
//! - The `"default"` key is only ever a fallback value, never a pattern.
//! - Values are coerced to float at lookup time; a malformed value fails that
//!   lookup and the fallback is used instead.

use serde_json::{Map, Value};
use url::Url;

/// Ordered pattern → weight table as written in the config.
pub type SourceWeights = Map<String, Value>;

/// Weight used when the table is empty or has no usable `"default"`.
pub const NEUTRAL_SOURCE_WEIGHT: f64 = 0.5;

const DEFAULT_KEY: &str = "default";

/// Reputation weight for `source`.
pub fn apply_source_weighting(source: &str, source_weights: &SourceWeights) -> f64 {
    if source_weights.is_empty() {
        return NEUTRAL_SOURCE_WEIGHT;
    }
    match lookup(source, source_weights) {
        Some(w) => w,
        None => fallback(source_weights),
    }
}

/// Exact match, then domain match. `None` means "use the fallback", either
/// because nothing matched or because the matching value was malformed.
fn lookup(source: &str, source_weights: &SourceWeights) -> Option<f64> {
    // 1) Exact key (case-sensitive first, then case-insensitive).
    let exact = source_weights
        .get(source)
        .filter(|_| source != DEFAULT_KEY)
        .or_else(|| {
            source_weights
                .iter()
                .find(|(k, _)| k.as_str() != DEFAULT_KEY && k.eq_ignore_ascii_case(source))
                .map(|(_, v)| v)
        });
    if let Some(v) = exact {
        return coerce_weight(v);
    }

    // 2) First configured pattern contained in (or equal to) the domain.
    let domain = source_domain(source);
    if domain.is_empty() {
        return None;
    }
    source_weights
        .iter()
        .filter(|(k, _)| k.as_str() != DEFAULT_KEY)
        .find(|(k, _)| {
            let pattern = k.trim().to_ascii_lowercase();
            !pattern.is_empty() && domain.contains(&pattern)
        })
        .and_then(|(_, v)| coerce_weight(v))
}

fn fallback(source_weights: &SourceWeights) -> f64 {
    source_weights
        .get(DEFAULT_KEY)
        .and_then(coerce_weight)
        .unwrap_or(NEUTRAL_SOURCE_WEIGHT)
}

/// Lowercased host of `source`; for scheme-less identifiers (`sam.gov/feed`)
/// everything before the first `/`.
pub fn source_domain(source: &str) -> String {
    let trimmed = source.trim();
    if let Ok(u) = Url::parse(trimmed) {
        if let Some(host) = u.host_str() {
            return host.to_ascii_lowercase();
        }
    }
    trimmed
        .split('/')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Numbers are taken as-is, numeric strings are parsed; anything else fails.
pub fn coerce_weight(v: &Value) -> Option<f64> {
    let w = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    w.is_finite().then_some(w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(v: Value) -> SourceWeights {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn empty_table_is_neutral() {
        assert_eq!(apply_source_weighting("https://example.com/feed", &Map::new()), 0.5);
    }

    #[test]
    fn exact_match_beats_domain_rule() {
        let w = table(json!({"https://example.com/page": 0.8, "default": 0.5}));
        assert_eq!(apply_source_weighting("https://example.com/page", &w), 0.8);
    }

    #[test]
    fn domain_match_uses_config_order() {
        let w = table(json!({"example.com": 0.8, "com": 0.3, "other.com": 0.1}));
        assert_eq!(apply_source_weighting("https://example.com/path/to/feed", &w), 0.8);

        let w = table(json!({"com": 0.3, "example.com": 0.8}));
        assert_eq!(apply_source_weighting("https://example.com/path/to/feed", &w), 0.3);
    }

    #[test]
    fn scheme_less_sources_and_case() {
        let w = table(json!({"Example.Com": 0.9}));
        assert_eq!(apply_source_weighting("example.com/feed", &w), 0.9);
        let w = table(json!({"gov": 0.95}));
        assert_eq!(apply_source_weighting("sam.gov/feed", &w), 0.95);
    }

    #[test]
    fn default_is_fallback_not_pattern() {
        let w = table(json!({"trusted.gov": 1.5, "default": 0.4}));
        assert_eq!(apply_source_weighting("https://unknown.com/feed", &w), 0.4);
        // A host literally containing "default" still only gets the fallback value.
        let w = table(json!({"default": 0.7}));
        assert_eq!(apply_source_weighting("https://default.org/rss", &w), 0.7);

        let w = table(json!({"trusted.gov": 1.5}));
        assert_eq!(apply_source_weighting("https://unknown.com/feed", &w), 0.5);
    }

    #[test]
    fn values_are_coerced_and_malformed_values_fall_back() {
        let w = table(json!({"sam.gov": "0.9", "default": 0.2}));
        assert_eq!(apply_source_weighting("https://sam.gov/opps", &w), 0.9);

        let w = table(json!({"sam.gov": "high", "default": 0.2}));
        assert_eq!(apply_source_weighting("https://sam.gov/opps", &w), 0.2);

        let w = table(json!({"sam.gov": null, "default": "oops"}));
        assert_eq!(apply_source_weighting("https://sam.gov/opps", &w), 0.5);
    }

    #[test]
    fn domain_extraction() {
        assert_eq!(source_domain("https://Sub.Example.com:8443/a?b"), "sub.example.com");
        assert_eq!(source_domain("sam.gov/feed"), "sam.gov");
        assert_eq!(source_domain(""), "");
    }
}
