//! Monthly financial totals.
//!
//! Amounts are accumulated in whole cents, so the twelve monthly totals of a
//! year always add up to the yearly total.

use serde::{Deserialize, Serialize};

use crate::format::{format_cents, in_month, sum_cents, to_cents};
use crate::models::VisitRecord;

/// Visits and revenue for one month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthTotal {
    /// 1-12
    pub month: u32,
    pub visit_count: usize,
    pub total_cents: i64,
}

impl MonthTotal {
    /// Total as `"D,DD"`.
    pub fn total(&self) -> String {
        format_cents(self.total_cents)
    }
}

fn records_in_month(
    records: &[VisitRecord],
    month: u32,
    year: i32,
) -> impl Iterator<Item = &VisitRecord> {
    records.iter().filter(move |r| {
        r.parsed_date()
            .map_or(false, |date| in_month(date, month, year))
    })
}

/// Visit count and cents for a month. Records without a valid date are excluded.
pub fn month_total(records: &[VisitRecord], month: u32, year: i32) -> MonthTotal {
    let (visit_count, total_cents) = records_in_month(records, month, year)
        .fold((0usize, 0i64), |(count, cents), r| {
            (count + 1, cents.saturating_add(to_cents(r.amount_value())))
        });

    MonthTotal {
        month,
        visit_count,
        total_cents,
    }
}

/// Sum of amounts for a month as a number.
pub fn monthly_sum(records: &[VisitRecord], month: u32, year: i32) -> f64 {
    month_total(records, month, year).total_cents as f64 / 100.0
}

/// Sum of amounts for a month as `"D,DD"`; `"0,00"` when nothing matches.
pub fn monthly_total(records: &[VisitRecord], month: u32, year: i32) -> String {
    month_total(records, month, year).total()
}

/// All twelve months of a year, January first.
pub fn yearly_breakdown(records: &[VisitRecord], year: i32) -> Vec<MonthTotal> {
    (1..=12).map(|month| month_total(records, month, year)).collect()
}

/// Sum of every dated record in a year, in cents.
pub fn yearly_cents(records: &[VisitRecord], year: i32) -> i64 {
    use chrono::Datelike;

    sum_cents(
        records
            .iter()
            .filter(|r| r.parsed_date().map_or(false, |d| d.year() == year))
            .map(|r| to_cents(r.amount_value())),
    )
}

/// Sum of every dated record in a year as a number.
pub fn yearly_sum(records: &[VisitRecord], year: i32) -> f64 {
    yearly_cents(records, year) as f64 / 100.0
}
