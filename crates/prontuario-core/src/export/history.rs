//! Patient history export.

use serde::{Deserialize, Serialize};

use super::{escape_csv, hash_data};
use crate::format::{display_or_missing, format_cents, sum_cents, to_cents};
use crate::models::{PatientContact, VisitRecord};

/// Full history of one patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientHistoryExport {
    pub metadata: HistoryMetadata,
    /// Contact details from the most recent visit
    pub contact: PatientContact,
    /// Visits, newest first
    pub visits: Vec<ExportedVisit>,
}

/// Patient history export metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryMetadata {
    pub patient_name: String,
    pub practitioner_name: Option<String>,
    /// RFC 3339
    pub exported_at: String,
    pub visit_count: usize,
    /// Sum of visit amounts, `"D,DD"`
    pub total: String,
    /// SHA-256 of the serialized visits
    pub content_hash: String,
}

/// One visit as it appears in an export. Missing values render as `"—"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportedVisit {
    pub id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub amount: String,
    pub visit_type: String,
    pub status: String,
    pub notes: String,
}

impl From<&VisitRecord> for ExportedVisit {
    fn from(record: &VisitRecord) -> Self {
        let or_missing = |value: Option<&str>| display_or_missing(value).to_string();
        Self {
            id: record.id.clone(),
            date: or_missing(record.visit_date.as_deref()),
            start_time: or_missing(record.start_time.as_deref()),
            end_time: or_missing(record.end_time.as_deref()),
            amount: or_missing(record.amount.as_deref()),
            visit_type: or_missing(record.visit_type.map(|t| t.as_str())),
            status: or_missing(record.status.map(|s| s.as_str())),
            notes: or_missing(record.notes.as_deref()),
        }
    }
}

impl PatientHistoryExport {
    /// Build from a patient's records, given newest first.
    pub fn from_records(
        patient_name: &str,
        records: &[VisitRecord],
        practitioner_name: Option<String>,
    ) -> Self {
        let visits: Vec<ExportedVisit> = records.iter().map(ExportedVisit::from).collect();
        let total_cents = sum_cents(records.iter().map(|r| to_cents(r.amount_value())));
        // Vec<ExportedVisit> only holds strings, serialization cannot fail
        let content_hash = serde_json::to_vec(&visits)
            .map(|bytes| hash_data(&bytes))
            .unwrap_or_default();

        Self {
            metadata: HistoryMetadata {
                patient_name: patient_name.to_string(),
                practitioner_name,
                exported_at: chrono::Utc::now().to_rfc3339(),
                visit_count: visits.len(),
                total: format_cents(total_cents),
                content_hash,
            },
            contact: records
                .first()
                .map(|r| r.contact.clone())
                .unwrap_or_default(),
            visits,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format, one row per visit.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        csv.push_str("paciente,id,data,inicio,fim,valor,tipo_atendimento,status,evolucao\n");

        for visit in &self.visits {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{}\n",
                escape_csv(&self.metadata.patient_name),
                escape_csv(&visit.id),
                escape_csv(&visit.date),
                escape_csv(&visit.start_time),
                escape_csv(&visit.end_time),
                escape_csv(&visit.amount),
                escape_csv(&visit.visit_type),
                escape_csv(&visit.status),
                escape_csv(&visit.notes),
            ));
        }

        csv
    }
}
