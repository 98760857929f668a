//! Exports for patient histories and financial reports.

mod financial;
mod history;

pub use financial::*;
pub use history::*;

use sha2::{Digest, Sha256};

use crate::db::{Database, DbResult};

/// Builds exports from the local store.
pub struct RecordExporter<'a> {
    db: &'a Database,
    practitioner_name: Option<String>,
}

impl<'a> RecordExporter<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            practitioner_name: None,
        }
    }

    /// Set the practitioner shown on exports.
    pub fn with_practitioner(mut self, name: Option<String>) -> Self {
        self.practitioner_name = name;
        self
    }

    /// Every visit of one patient, newest first.
    pub fn export_patient(&self, name: &str) -> DbResult<PatientHistoryExport> {
        let records = self.db.records_for_patient(name)?;
        let export = PatientHistoryExport::from_records(
            name.trim(),
            &records,
            self.practitioner_name.clone(),
        );
        tracing::info!(
            patient = %export.metadata.patient_name,
            visits = export.metadata.visit_count,
            "Exported patient history"
        );
        Ok(export)
    }

    /// Month-by-month revenue for a year.
    pub fn financial_report(&self, year: i32) -> DbResult<FinancialReport> {
        let records = self.db.list_records()?;
        let report = FinancialReport::from_records(&records, year, self.practitioner_name.clone());
        tracing::info!(year, total = %report.yearly_total, "Built financial report");
        Ok(report)
    }
}

/// Compute SHA-256 of data as lowercase hex.
pub(crate) fn hash_data(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Escape a string for CSV output.
pub(crate) fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VisitRecord;

    fn record(name: &str, date: &str, amount: &str) -> VisitRecord {
        let mut r = VisitRecord::new(name.into());
        r.visit_date = Some(date.into());
        r.amount = Some(amount.into());
        r
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_hash_data() {
        assert_eq!(
            hash_data(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_exporter_reads_store() {
        let db = Database::open_in_memory().unwrap();
        db.insert_record(&record("Ana", "10/03/2025", "R$ 150,00")).unwrap();
        db.insert_record(&record("Ana ", "02/01/2025", "R$ 100,00")).unwrap();
        db.insert_record(&record("Bruno", "15/03/2025", "R$ 80,50")).unwrap();

        let exporter = RecordExporter::new(&db).with_practitioner(Some("Dra. Helena".into()));

        let history = exporter.export_patient(" Ana").unwrap();
        assert_eq!(history.metadata.patient_name, "Ana");
        assert_eq!(history.metadata.visit_count, 2);
        assert_eq!(history.metadata.total, "250,00");
        assert!(history.visits.iter().all(|v| v.date != "15/03/2025"));

        let report = exporter.financial_report(2025).unwrap();
        assert_eq!(report.months[0].total, "100,00");
        assert_eq!(report.months[2].total, "230,50");
        assert_eq!(report.yearly_total, "330,50");
        assert_eq!(report.practitioner_name.as_deref(), Some("Dra. Helena"));
    }
}
