// src/budget.rs
//! Heuristic budget extraction from free-text notices.
//!
//! Precedence (first satisfied branch wins):
//! 1. "No specific amount" phrases (`under $50k`, `small purchase`, `not to exceed`)
//!    short-circuit to an amount-less budget, even when a number is present.
//! 2. Thousands separators are stripped and every amount pattern is scanned:
//!    - `<n> million` / `<n>M` (optionally followed by a currency marker), also
//!      directly after `$`/`USD`/`€` (`USD2.5M`) → ×1,000,000
//!    - `$<n>k` / `USD <n>k` / `<n>k USD` → ×1,000
//!    - `$`, `USD`, `€` or a `budget|value|worth` label followed by a number,
//!      and `<n> USD`
//!    - ranges `A[k|m]-B[k|m]`, each endpoint scaled by its own suffix; a suffix
//!      must end the word, so units like `mm` or `kg` are not multipliers
//! 3. The largest candidate wins; ties go to the earliest match in the text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::entry::Budget;

/// `matched_text` reported when the notice only signals a small / capped purchase.
pub const UNDER_THRESHOLD_TEXT: &str = "indicated small/under threshold";

static RE_UNDER_THRESHOLD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)under \$?\s?\d+k?|small purchase|not to exceed").expect("threshold regex")
});

static RE_MILLION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)(?:\s*million\b|m\b)(?:\s*(?:USD|US\$|\$|€|EUR|dollars))?")
        .expect("million regex")
});

static RE_MARKED_MILLION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:\$|USD|US\$|€|EUR)\s?(\d+(?:\.\d+)?)\s*(?:million\b|m\b)")
        .expect("marked million regex")
});

static RE_THOUSAND_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:\$|USD)\s?(\d+(?:\.\d+)?)\s?k\b").expect("thousand prefix regex")
});

static RE_THOUSAND_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s?k\s?USD\b").expect("thousand suffix regex")
});

static RE_MARKED_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:\$|USD|€|\b(?:budget|value|worth)\b\s*[:=]?\s*\$?)\s?(\d+(?:\.\d+)?)")
        .expect("marked amount regex")
});

static RE_USD_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s?USD\b").expect("usd suffix regex"));

static RE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\$?(\d+(?:\.\d+)?)([km])?\b ?- ?\$?(\d+(?:\.\d+)?)([km])?\b")
        .expect("range regex")
});

#[derive(Debug, Clone)]
struct Candidate {
    amount: f64,
    start: usize,
    text: String,
}

/// Extract the most prominent amount from `text`.
///
/// Returns `None` when nothing matched, `Some` with `amount: None` for the
/// small-purchase phrases, and the largest candidate otherwise.
pub fn extract_budget(text: &str) -> Option<Budget> {
    if text.trim().is_empty() {
        return None;
    }

    if RE_UNDER_THRESHOLD.is_match(text) {
        return Some(Budget::usd(None, UNDER_THRESHOLD_TEXT));
    }

    let text = strip_thousands_separators(text);
    let mut candidates = Vec::new();

    for caps in RE_MILLION.captures_iter(&text) {
        let (Some(whole), Some(num)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if !starts_number(&text, num.start()) {
            continue;
        }
        push_candidate(&mut candidates, num.as_str(), 1_000_000.0, whole.start(), whole.as_str());
    }

    // A currency marker glued to the number (`USD2.5M`) still counts.
    for caps in RE_MARKED_MILLION.captures_iter(&text) {
        let (Some(whole), Some(num)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        push_candidate(&mut candidates, num.as_str(), 1_000_000.0, whole.start(), whole.as_str());
    }

    for re in [&*RE_THOUSAND_PREFIX, &*RE_THOUSAND_SUFFIX] {
        for caps in re.captures_iter(&text) {
            let (Some(whole), Some(num)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            push_candidate(&mut candidates, num.as_str(), 1_000.0, whole.start(), whole.as_str());
        }
    }

    for re in [&*RE_MARKED_AMOUNT, &*RE_USD_SUFFIX] {
        for caps in re.captures_iter(&text) {
            let (Some(whole), Some(num)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            push_candidate(&mut candidates, num.as_str(), 1.0, whole.start(), whole.as_str());
        }
    }

    for caps in RE_RANGE.captures_iter(&text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        for (num_idx, suffix_idx) in [(1, 2), (3, 4)] {
            let Some(num) = caps.get(num_idx) else {
                continue;
            };
            let factor = suffix_factor(caps.get(suffix_idx).map(|m| m.as_str()));
            push_candidate(&mut candidates, num.as_str(), factor, whole.start(), whole.as_str());
        }
    }

    pick_largest(candidates).map(|c| Budget::usd(Some(c.amount), c.text))
}

/// Remove `,` between digits (`1,250,000.00` → `1250000.00`).
fn strip_thousands_separators(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, &ch) in chars.iter().enumerate() {
        if ch == ','
            && i > 0
            && chars[i - 1].is_ascii_digit()
            && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit())
        {
            continue;
        }
        out.push(ch);
    }
    out
}

/// A number only counts for the "million" rule when it is not glued to a
/// preceding `%` (URL escapes like `%20M`) or word character.
fn starts_number(text: &str, start: usize) -> bool {
    match text[..start].chars().next_back() {
        None => true,
        Some(prev) => prev != '%' && !prev.is_alphanumeric() && prev != '_',
    }
}

fn suffix_factor(suffix: Option<&str>) -> f64 {
    match suffix.map(|s| s.to_ascii_lowercase()).as_deref() {
        Some("k") => 1_000.0,
        Some("m") => 1_000_000.0,
        _ => 1.0,
    }
}

fn push_candidate(out: &mut Vec<Candidate>, number: &str, factor: f64, start: usize, text: &str) {
    let Ok(value) = number.parse::<f64>() else {
        return;
    };
    let amount = value * factor;
    if amount.is_finite() {
        out.push(Candidate {
            amount,
            start,
            text: text.to_string(),
        });
    }
}

/// Largest amount wins; on equal amounts the earliest match in the text is kept.
fn pick_largest(mut candidates: Vec<Candidate>) -> Option<Candidate> {
    candidates.sort_by_key(|c| c.start);
    candidates.into_iter().fold(None, |best, c| match best {
        Some(b) if b.amount >= c.amount => Some(b),
        _ => Some(c),
    })
}
