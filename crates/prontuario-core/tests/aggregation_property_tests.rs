//! Property-based tests for masks and record aggregation.
//!
//! Invariants tested:
//! - Every mask is idempotent
//! - The date mask grows monotonically while typing and never exceeds `DD/MM/YYYY`
//! - Parsing a masked amount gives back the typed value
//! - Deduplication yields one summary per trimmed name, holding the latest date
//! - The twelve monthly totals of a year add up to the yearly total

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use proptest::prelude::*;
use prontuario_core::aggregate::{
    deduplicate_patients, monthly_total, sort_by_recent, yearly_breakdown, yearly_cents,
};
use prontuario_core::format::{
    cpf_mask, currency_mask, date_mask, parse_amount, phone_mask, time_mask, to_cents,
};
use prontuario_core::VisitRecord;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn record(name: &str, date: &str, amount: &str) -> VisitRecord {
    let mut r = VisitRecord::new(name.to_string());
    r.visit_date = Some(date.to_string());
    r.amount = Some(amount.to_string());
    r
}

/// Names with spacing variants and blanks, so trimming matters.
fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Ana".to_string()),
        Just(" Ana ".to_string()),
        Just("Bruno".to_string()),
        Just("Bruno\t".to_string()),
        Just("Álvaro".to_string()),
        Just("ana".to_string()),
        Just("".to_string()),
        Just("   ".to_string()),
    ]
}

/// Valid `DD/MM/YYYY` dates over three years, plus malformed values.
fn date_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => (1u32..=28, 1u32..=12, 2023i32..=2025)
            .prop_map(|(d, m, y)| format!("{:02}/{:02}/{}", d, m, y)),
        1 => Just("".to_string()),
        1 => Just("31/02/2024".to_string()),
        1 => Just("ontem".to_string()),
    ]
}

/// Canonical amounts, plus the odd unparseable one.
fn amount_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        6 => (0u64..1_000_000).prop_map(|cents| currency_mask(&cents.to_string())),
        1 => Just("".to_string()),
        1 => Just("a combinar".to_string()),
    ]
}

fn records_strategy() -> impl Strategy<Value = Vec<VisitRecord>> {
    prop::collection::vec(
        (name_strategy(), date_strategy(), amount_strategy())
            .prop_map(|(n, d, a)| record(&n, &d, &a)),
        0..40,
    )
}

// ── proptest! blocks ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn prop_masks_idempotent(input in ".{0,24}") {
        let masks: [fn(&str) -> String; 5] = [time_mask, date_mask, currency_mask, phone_mask, cpf_mask];
        for mask in masks {
            let once = mask(&input);
            prop_assert_eq!(mask(&once), once);
        }
    }

    #[test]
    fn prop_date_mask_progressive(typed in "[0-9]{0,14}") {
        let mut previous = 0;
        for end in 0..=typed.len() {
            let shown = date_mask(&typed[..end]);
            prop_assert!(shown.len() >= previous);
            prop_assert!(shown.len() <= 10);
            previous = shown.len();
        }
    }

    #[test]
    fn prop_currency_round_trip(cents in 0u64..10_000_000_000) {
        let value = cents as f64 / 100.0;
        prop_assert_eq!(parse_amount(&currency_mask(&cents.to_string())), value);
    }

    #[test]
    fn prop_dedup_one_summary_per_name(records in records_strategy()) {
        let summaries = deduplicate_patients(&records);

        let distinct: HashSet<&str> = records.iter().filter_map(|r| r.patient_key()).collect();
        prop_assert_eq!(summaries.len(), distinct.len());

        let mut latest: HashMap<&str, Option<NaiveDate>> = HashMap::new();
        for r in &records {
            if let Some(name) = r.patient_key() {
                let entry = latest.entry(name).or_insert(None);
                *entry = (*entry).max(r.parsed_date());
            }
        }
        for summary in &summaries {
            prop_assert_eq!(
                summary.latest.parsed_date(),
                latest[summary.patient_name.as_str()]
            );
            prop_assert_eq!(summary.latest.patient_key(), Some(summary.patient_name.as_str()));
        }

        let counted: usize = summaries.iter().map(|s| s.visit_count).sum();
        prop_assert_eq!(counted, records.iter().filter(|r| r.patient_key().is_some()).count());
    }

    #[test]
    fn prop_monthly_totals_add_up(records in records_strategy(), year in 2023i32..=2025) {
        let months = yearly_breakdown(&records, year);
        prop_assert_eq!(months.len(), 12);

        let monthly: i64 = months.iter().map(|m| m.total_cents).sum();
        prop_assert_eq!(monthly, yearly_cents(&records, year));

        let expected: i64 = records
            .iter()
            .filter(|r| r.parsed_date().map_or(false, |d| chrono::Datelike::year(&d) == year))
            .map(|r| to_cents(r.amount.as_deref().map(parse_amount).unwrap_or(0.0)))
            .sum();
        prop_assert_eq!(monthly, expected);
    }

    #[test]
    fn prop_sort_is_chronological(mut records in records_strategy()) {
        sort_by_recent(&mut records);
        for pair in records.windows(2) {
            prop_assert!(pair[0].parsed_date() >= pair[1].parsed_date());
        }
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[test]
fn test_sort_ties_broken_by_name() {
    let mut records = vec![
        record("Carla", "15/01/2024", ""),
        record("Bruno", "01/02/2024", ""),
        record("Ana", "01/02/2024", ""),
    ];
    sort_by_recent(&mut records);

    let names: Vec<&str> = records.iter().map(|r| r.patient_name.as_str()).collect();
    assert_eq!(names, vec!["Ana", "Bruno", "Carla"]);
}

#[test]
fn test_empty_inputs() {
    assert_eq!(monthly_total(&[], 5, 2025), "0,00");
    assert!(deduplicate_patients(&[]).is_empty());
    assert_eq!(currency_mask(""), "");
}

#[test]
fn test_blank_date_is_oldest_and_unbilled() {
    let records = vec![
        record("Ana", "", "R$ 500,00"),
        record("Bruno", "01/01/2000", "R$ 10,00"),
    ];

    for year in [2000, 2024, 2025] {
        for month in 1..=12 {
            let total = monthly_total(&records[..1], month, year);
            assert_eq!(total, "0,00");
        }
    }

    let mut sorted = records.clone();
    sort_by_recent(&mut sorted);
    assert_eq!(sorted[0].patient_name, "Bruno");
    assert_eq!(sorted[1].patient_name, "Ana");
}
