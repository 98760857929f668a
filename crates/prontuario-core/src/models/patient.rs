//! Patient-level views derived from visit records.
//!
//! Patients are not stored on their own: a patient is the set of records
//! sharing a trimmed name, recomputed on every load.

use serde::{Deserialize, Serialize};

use super::record::{PatientContact, VisitRecord};

/// The most recent record for one patient name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientSummary {
    /// Trimmed patient name
    pub patient_name: String,
    /// Most recent record by visit date
    pub latest: VisitRecord,
    /// Number of records grouped under this name
    pub visit_count: usize,
}

impl PatientSummary {
    pub fn contact(&self) -> &PatientContact {
        &self.latest.contact
    }
}

/// All visits of a single patient, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientHistory {
    /// Trimmed patient name
    pub patient_name: String,
    /// Records, newest first
    pub visits: Vec<VisitRecord>,
}

impl PatientHistory {
    /// Most recent visit, if any.
    pub fn latest(&self) -> Option<&VisitRecord> {
        self.visits.first()
    }

    /// Contact details from the most recent visit.
    pub fn contact(&self) -> Option<&PatientContact> {
        self.latest().map(|v| &v.contact)
    }

    pub fn visit_count(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// Sum of all visit amounts, in cents.
    pub fn total_cents(&self) -> i64 {
        crate::format::sum_cents(
            self.visits
                .iter()
                .map(|v| crate::format::to_cents(v.amount_value())),
        )
    }
}
