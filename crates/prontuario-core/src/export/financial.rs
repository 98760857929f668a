//! Yearly financial report.

use serde::{Deserialize, Serialize};

use super::escape_csv;
use crate::aggregate::yearly_breakdown;
use crate::format::{format_cents, sum_cents};
use crate::models::VisitRecord;

/// Portuguese month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialReport {
    pub year: i32,
    pub practitioner_name: Option<String>,
    /// RFC 3339
    pub generated_at: String,
    /// Always twelve entries, January first
    pub months: Vec<FinancialMonth>,
    pub visit_count: usize,
    /// `"D,DD"`
    pub yearly_total: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialMonth {
    pub month: u32,
    pub name: String,
    pub visit_count: usize,
    /// `"D,DD"`
    pub total: String,
}

impl FinancialReport {
    pub fn from_records(records: &[VisitRecord], year: i32, practitioner_name: Option<String>) -> Self {
        let breakdown = yearly_breakdown(records, year);
        let yearly_cents = sum_cents(breakdown.iter().map(|m| m.total_cents));
        let visit_count = breakdown.iter().map(|m| m.visit_count).sum();

        let months = breakdown
            .iter()
            .zip(MONTH_NAMES)
            .map(|(m, name)| FinancialMonth {
                month: m.month,
                name: name.to_string(),
                visit_count: m.visit_count,
                total: m.total(),
            })
            .collect();

        Self {
            year,
            practitioner_name,
            generated_at: chrono::Utc::now().to_rfc3339(),
            months,
            visit_count,
            yearly_total: format_cents(yearly_cents),
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format: one row per month plus a total row.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        csv.push_str("ano,mes,atendimentos,total\n");

        for month in &self.months {
            csv.push_str(&format!(
                "{},{},{},{}\n",
                self.year,
                escape_csv(&month.name),
                month.visit_count,
                escape_csv(&month.total),
            ));
        }
        csv.push_str(&format!(
            "{},Total,{},{}\n",
            self.year,
            self.visit_count,
            escape_csv(&self.yearly_total),
        ));

        csv
    }
}
