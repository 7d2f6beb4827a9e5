// tests/budget_corner_cases.rs
use rfp_intelligence::budget::UNDER_THRESHOLD_TEXT;
use rfp_intelligence::extract_budget;

fn amount(text: &str) -> Option<f64> {
    extract_budget(text).and_then(|b| b.amount)
}

#[test]
fn range_upper_bound() {
    let b = extract_budget("Budget: $50k-$200k").expect("range");
    assert_eq!(b.amount, Some(200_000.0));
    assert_eq!(b.currency, "USD");
}

#[test]
fn under_threshold_has_no_amount() {
    let b = extract_budget("under $50k budget").expect("threshold");
    assert_eq!(b.amount, None);
    assert_eq!(b.matched_text, UNDER_THRESHOLD_TEXT);
}

#[test]
fn threshold_beats_larger_numbers() {
    let b = extract_budget("Contract value $3,000,000, not to exceed the ceiling").unwrap();
    assert_eq!(b.amount, None);
}

#[test]
fn largest_candidate_dominates_even_in_unrelated_clause() {
    // The agency's portfolio dwarfs the actual contract value.
    assert_eq!(
        amount("Contract budget: $80,000. The implementing agency manages $900M in assets."),
        Some(900_000_000.0)
    );
}

#[test]
fn mixed_suffix_range_endpoints() {
    assert_eq!(amount("Expected envelope 500k-1.2m"), Some(1_200_000.0));
    let b = extract_budget("Expected envelope 500k-1.2m").unwrap();
    assert_eq!(b.matched_text, "500k-1.2m");
}

#[test]
fn decimals_survive_suffix_multiplication() {
    assert_eq!(amount("Worth $2.75M"), Some(2_750_000.0));
    assert_eq!(amount("Budget: $1500.50"), Some(1500.5));
}

#[test]
fn url_escapes_and_identifiers_are_ignored() {
    assert_eq!(extract_budget("Download https://example.com/tor%201M.pdf"), None);
    assert_eq!(extract_budget("Model ABC10M sensors"), None);
}

#[test]
fn currency_marker_glued_to_million() {
    let b = extract_budget("Contract value USD2.5M").unwrap();
    assert_eq!(b.amount, Some(2_500_000.0));
    assert_eq!(b.matched_text, "USD2.5M");
    assert_eq!(amount("Contract value USD2.5 million"), Some(2_500_000.0));
    assert_eq!(amount("Ceiling €3M"), Some(3_000_000.0));
}

#[test]
fn unit_abbreviations_are_not_multipliers() {
    assert_eq!(extract_budget("Supply of 10-25mm steel cables"), None);
    assert_eq!(extract_budget("Supply of 20-50kg bags of maize"), None);
    // Real suffixes still scale.
    assert_eq!(amount("Supply of 20-50kg bags, budget 500k-1.2m"), Some(1_200_000.0));
}

#[test]
fn iso_date_reads_as_a_bare_range() {
    // "2026-03" is a range of bare numbers and outranks the small stated budget.
    let b = extract_budget("Deadline 2026-03-15. Budget: $1,500").unwrap();
    assert_eq!(b.amount, Some(2026.0));
    assert_eq!(b.matched_text, "2026-03");
}

#[test]
fn euro_marker_is_reported_as_usd() {
    let b = extract_budget("Budget: €750,000").unwrap();
    assert_eq!(b.amount, Some(750_000.0));
    assert_eq!(b.currency, "USD");
}

#[test]
fn deterministic() {
    let text = "Value between $120k - $340k, worth up to USD 400000";
    assert_eq!(extract_budget(text), extract_budget(text));
    assert_eq!(amount(text), Some(400_000.0));
}
