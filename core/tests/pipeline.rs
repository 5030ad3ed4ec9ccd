//! Tests for the transform pipeline.
//!
//! Covered behaviours:
//! 1. Only account-tagged source rows reach the output
//! 2. Overage arithmetic with blank-cell coercion
//! 3. Reporting thresholds (overage >= 10, paid licenses > 0)
//! 4. Descending, stable ordering by overage
//! 5. Enrichment join by comma-stripped account id

use debtsync_core::enrichment::AnalyticsRow;
use debtsync_core::pipeline::{
    build_debtors, enrichment_by_account, numeric, parse_source_rows, ACCOUNT_CATEGORY_TAG,
};
use serde_json::Value;
use std::collections::HashMap;

/// A 23-column source row with the fields the pipeline reads filled in.
fn source_row(id: &str, name: &str, paid: &str, active: &str, category: &str) -> Vec<String> {
    let mut row = vec![String::new(); 23];
    row[0] = id.into();
    row[1] = name.into();
    row[3] = paid.into();
    row[9] = active.into();
    row[12] = category.into();
    row[13] = "12".into(); // license price
    row[19] = "01.06.25".into(); // payment date
    row[20] = "invoice".into(); // payment method
    row[22] = "alice".into(); // responsible
    row
}

fn account_row(id: &str, name: &str, paid: &str, active: &str) -> Vec<String> {
    source_row(id, name, paid, active, ACCOUNT_CATEGORY_TAG)
}

fn analytics_row(id: Value, email: &str, phone: &str) -> AnalyticsRow {
    let mut row = AnalyticsRow::new();
    row.insert("id".into(), id);
    row.insert("email".into(), Value::String(email.into()));
    row.insert("phone_number".into(), Value::String(phone.into()));
    row
}

fn no_enrichment() -> HashMap<String, debtsync_core::pipeline::EnrichmentRecord> {
    HashMap::new()
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: only account-tagged rows survive the filter
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn non_account_rows_never_surface() {
    let rows = vec![
        source_row("1", "Trial Co", "5", "90", "Trial"),
        source_row("2", "Untagged Co", "5", "90", ""),
        account_row("3", "Real Co", "5", "90"),
    ];
    let debtors = build_debtors(parse_source_rows(&rows), &no_enrichment());
    assert_eq!(debtors.len(), 1);
    assert_eq!(debtors[0].account_id, "3");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: overage arithmetic and coercion
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn overage_is_active_minus_paid() {
    // Worked example: paid=5, active=20, no analytics match.
    let rows = vec![account_row("123", "Acme", "5", "20")];
    let debtors = build_debtors(parse_source_rows(&rows), &no_enrichment());
    assert_eq!(debtors.len(), 1);
    assert_eq!(debtors[0].overage, 15);
    assert_eq!(debtors[0].email, "");
    assert_eq!(debtors[0].phone, "");
}

#[test]
fn blank_and_garbage_cells_coerce_to_zero() {
    assert_eq!(numeric(""), 0);
    assert_eq!(numeric("  "), 0);
    assert_eq!(numeric("n/a"), 0);
    assert_eq!(numeric(" 42 "), 42);

    // Blank paid licenses count as zero paid — excluded by the paid > 0 rule
    // even though the overage itself clears the threshold.
    let rows = vec![account_row("1", "Blank Paid", "", "50")];
    assert!(build_debtors(parse_source_rows(&rows), &no_enrichment()).is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: reporting thresholds
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn zero_paid_licenses_excluded_despite_overage() {
    // Worked example: paid=0, active=50 — overage 50 but not a paying account.
    let rows = vec![account_row("7", "Freeloader", "0", "50")];
    assert!(build_debtors(parse_source_rows(&rows), &no_enrichment()).is_empty());
}

#[test]
fn overage_threshold_is_inclusive_at_ten() {
    let rows = vec![
        account_row("at", "At Threshold", "10", "20"), // overage 10
        account_row("below", "Below Threshold", "10", "19"), // overage 9
    ];
    let debtors = build_debtors(parse_source_rows(&rows), &no_enrichment());
    assert_eq!(debtors.len(), 1);
    assert_eq!(debtors[0].account_id, "at");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: ordering
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn output_sorted_descending_by_overage_stable_on_ties() {
    let rows = vec![
        account_row("a", "A", "5", "20"), // 15
        account_row("b", "B", "5", "35"), // 30
        account_row("c", "C", "5", "20"), // 15, after "a" in source order
        account_row("d", "D", "5", "25"), // 20
    ];
    let debtors = build_debtors(parse_source_rows(&rows), &no_enrichment());
    let ids: Vec<&str> = debtors.iter().map(|d| d.account_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "d", "a", "c"]);

    for pair in debtors.windows(2) {
        assert!(pair[0].overage >= pair[1].overage);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: enrichment join
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn enrichment_ids_match_with_commas_stripped() {
    let analytics = vec![analytics_row(
        Value::String("1,234".into()),
        "billing@acme.test",
        "+1 555 0100",
    )];
    let contacts = enrichment_by_account(&analytics);

    let rows = vec![account_row("1234", "Acme", "5", "20")];
    let debtors = build_debtors(parse_source_rows(&rows), &contacts);
    assert_eq!(debtors[0].email, "billing@acme.test");
    assert_eq!(debtors[0].phone, "+1 555 0100");
}

#[test]
fn numeric_analytics_ids_join_too() {
    let analytics = vec![analytics_row(Value::from(1234), "ops@acme.test", "")];
    let contacts = enrichment_by_account(&analytics);
    assert_eq!(contacts["1234"].email, "ops@acme.test");
}

#[test]
fn unmatched_accounts_keep_blank_contact_fields() {
    let analytics = vec![analytics_row(Value::String("999".into()), "x@y.test", "1")];
    let contacts = enrichment_by_account(&analytics);

    let rows = vec![account_row("1234", "Acme", "5", "20")];
    let debtors = build_debtors(parse_source_rows(&rows), &contacts);
    assert_eq!(debtors.len(), 1, "missing enrichment is not an error");
    assert_eq!(debtors[0].email, "");
    assert_eq!(debtors[0].phone, "");
}
