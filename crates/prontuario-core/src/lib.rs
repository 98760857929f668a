//! Prontuário Core Library
//!
//! Local-first clinic records: visit records ("prontuários"), patient views
//! derived from them, monthly billing totals, appointments and exports.
//!
//! # Architecture
//!
//! ```text
//!   Entry form ──► masks (format) ──► VisitRecord ──► SQLite store (db)
//!                                                          │
//!                                                  snapshot of records
//!                                                          │
//!                     ┌────────────────────┬───────────────┼────────────────┐
//!                     │                    │               │                │
//!                     ▼                    ▼               ▼                ▼
//!              deduplicate +         patient history   monthly totals   similar names
//!              sort (patients)                          (financeiro)
//!                     │                    │               │
//!                     └────────────────────┴───────┬───────┘
//!                                                  ▼
//!                                         Exports (JSON / CSV)
//! ```
//!
//! # Core Principle
//!
//! **A patient is a name.** Records are grouped by trimmed patient name; every
//! patient-level view is recomputed from the full record list on each load.
//!
//! # Modules
//!
//! - [`format`]: input masks, amount parsing, date helpers
//! - [`models`]: domain types (VisitRecord, PatientSummary, Appointment)
//! - [`aggregate`]: deduplication, sorting, monthly totals, history
//! - [`snapshot`]: JSON snapshot import/export
//! - [`db`]: SQLite store
//! - [`export`]: patient history and financial report exports
//! - [`session`]: signed-in session context
//! - [`config`]: clinic configuration

pub mod aggregate;
pub mod config;
pub mod db;
pub mod export;
pub mod format;
pub mod models;
pub mod session;
pub mod snapshot;

// Re-export commonly used types
pub use aggregate::{deduplicate_patients, monthly_total, sort_by_recent, MonthTotal};
pub use config::{ClinicConfig, ConfigError};
pub use db::Database;
pub use export::{FinancialReport, PatientHistoryExport, RecordExporter};
pub use models::{
    Appointment, PatientContact, PatientHistory, PatientSummary, ValidationError, VisitRecord,
    VisitStatus, VisitType,
};
pub use session::Session;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ProntuarioError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("No active session")]
    Unauthenticated,
}

impl From<db::DbError> for ProntuarioError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(id) => ProntuarioError::NotFound(id),
            db::DbError::Validation(v) => ProntuarioError::InvalidInput(v.to_string()),
            other => ProntuarioError::DatabaseError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ProntuarioError {
    fn from(e: serde_json::Error) -> Self {
        ProntuarioError::SerializationError(e.to_string())
    }
}

impl From<ConfigError> for ProntuarioError {
    fn from(e: ConfigError) -> Self {
        ProntuarioError::ConfigError(e.to_string())
    }
}

impl From<ValidationError> for ProntuarioError {
    fn from(e: ValidationError) -> Self {
        ProntuarioError::InvalidInput(e.to_string())
    }
}

impl From<models::UnknownLabel> for ProntuarioError {
    fn from(e: models::UnknownLabel) -> Self {
        ProntuarioError::InvalidInput(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for ProntuarioError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ProntuarioError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path with default settings.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<ProntuarioCore>, ProntuarioError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(ProntuarioCore::new(db, ClinicConfig::default())))
}

/// Load a JSON config file and open the database it names.
#[uniffi::export]
pub fn open_database_with_config(
    config_path: String,
) -> Result<Arc<ProntuarioCore>, ProntuarioError> {
    let config = ClinicConfig::load(&config_path)?;
    let db = Database::open(&config.database_path)?;
    Ok(Arc::new(ProntuarioCore::new(db, config)))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<ProntuarioCore>, ProntuarioError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(ProntuarioCore::new(db, ClinicConfig::default())))
}

// =========================================================================
// Input Masks (exported to FFI, no session needed)
// =========================================================================

/// `"0930"` → `"09h 30min"`.
#[uniffi::export]
pub fn format_time_input(input: String) -> String {
    format::time_mask(&input)
}

/// `"01022024"` → `"01/02/2024"`.
#[uniffi::export]
pub fn format_date_input(input: String) -> String {
    format::date_mask(&input)
}

/// `"12345"` → `"R$ 123,45"`.
#[uniffi::export]
pub fn format_currency_input(input: String) -> String {
    format::currency_mask(&input)
}

/// `"11912345678"` → `"(11) 9 1234-5678"`.
#[uniffi::export]
pub fn format_phone_input(input: String) -> String {
    format::phone_mask(&input)
}

/// `"12345678901"` → `"123.456.789-01"`.
#[uniffi::export]
pub fn format_cpf_input(input: String) -> String {
    format::cpf_mask(&input)
}

/// `"R$ 1.234,56"` → `1234.56`; unparseable text gives `0`.
#[uniffi::export]
pub fn parse_currency_input(display: String) -> f64 {
    format::parse_amount(&display)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
///
/// Every data operation requires an active session; see [`ProntuarioCore::sign_in`].
#[derive(uniffi::Object)]
pub struct ProntuarioCore {
    db: Arc<Mutex<Database>>,
    session: Mutex<Option<Session>>,
    config: ClinicConfig,
}

impl ProntuarioCore {
    fn new(db: Database, config: ClinicConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            session: Mutex::new(None),
            config,
        }
    }

    fn require_session(&self) -> Result<(), ProntuarioError> {
        let session = self.session.lock()?;
        match session.as_ref() {
            Some(s) if s.is_active() => Ok(()),
            _ => Err(ProntuarioError::Unauthenticated),
        }
    }

    fn summaries(&self) -> Result<Vec<PatientSummary>, ProntuarioError> {
        let db = self.db.lock()?;
        let records = db.list_records()?;
        Ok(deduplicate_patients(&records))
    }
}

#[uniffi::export]
impl ProntuarioCore {
    // =========================================================================
    // Session
    // =========================================================================

    /// Start a session for a user the identity provider has already verified.
    pub fn sign_in(&self, user: String) -> Result<FfiSession, ProntuarioError> {
        if user.trim().is_empty() {
            return Err(ProntuarioError::InvalidInput("user is required".into()));
        }
        let session = Session::start(user, self.config.session_ttl());
        tracing::info!(user = %session.user, session_id = %session.session_id, "Signed in");
        let ffi = FfiSession::from(&session);
        *self.session.lock()? = Some(session);
        Ok(ffi)
    }

    /// End the current session, if any.
    pub fn sign_out(&self) -> Result<(), ProntuarioError> {
        if let Some(mut session) = self.session.lock()?.take() {
            session.revoke();
            tracing::info!(user = %session.user, "Signed out");
        }
        Ok(())
    }

    /// The current session while it is still active.
    pub fn current_session(&self) -> Result<Option<FfiSession>, ProntuarioError> {
        let session = self.session.lock()?;
        Ok(session
            .as_ref()
            .filter(|s| s.is_active())
            .map(FfiSession::from))
    }

    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Create a new visit record.
    pub fn create_record(&self, input: FfiVisitInput) -> Result<FfiVisitRecord, ProntuarioError> {
        self.require_session()?;
        let mut record = VisitRecord::new(input.patient_name.clone());
        input.apply_to(&mut record)?;
        let db = self.db.lock()?;
        db.insert_record(&record)?;
        Ok(record.into())
    }

    /// Replace the fields of an existing record.
    pub fn update_record(
        &self,
        id: String,
        input: FfiVisitInput,
    ) -> Result<FfiVisitRecord, ProntuarioError> {
        self.require_session()?;
        let db = self.db.lock()?;
        let mut record = db
            .get_record(&id)?
            .ok_or_else(|| ProntuarioError::NotFound(id.clone()))?;
        record.patient_name = input.patient_name.clone();
        input.apply_to(&mut record)?;
        db.update_record(&record)?;
        // Re-read to pick up the update timestamp
        let updated = db
            .get_record(&id)?
            .ok_or_else(|| ProntuarioError::NotFound(id))?;
        Ok(updated.into())
    }

    /// Update only the contact details of a record.
    pub fn update_contact(&self, id: String, contact: FfiContact) -> Result<bool, ProntuarioError> {
        self.require_session()?;
        let db = self.db.lock()?;
        Ok(db.update_contact(&id, &contact.into())?)
    }

    /// Get a record by ID.
    pub fn get_record(&self, id: String) -> Result<Option<FfiVisitRecord>, ProntuarioError> {
        self.require_session()?;
        let db = self.db.lock()?;
        Ok(db.get_record(&id)?.map(Into::into))
    }

    /// Delete a single record.
    pub fn delete_record(&self, id: String) -> Result<bool, ProntuarioError> {
        self.require_session()?;
        let db = self.db.lock()?;
        Ok(db.delete_record(&id)?)
    }

    /// Delete every record of a patient. Returns the number deleted.
    pub fn delete_patient(&self, name: String) -> Result<u32, ProntuarioError> {
        self.require_session()?;
        let db = self.db.lock()?;
        Ok(db.delete_records_for_patient(&name)? as u32)
    }

    /// Replace the store with a JSON snapshot. Returns the number of records.
    pub fn import_snapshot(&self, json: String) -> Result<u32, ProntuarioError> {
        self.require_session()?;
        let records = snapshot::records_from_json(&json)?;
        let mut db = self.db.lock()?;
        Ok(db.import_records(&records)? as u32)
    }

    /// Dump the store as a JSON snapshot.
    pub fn export_snapshot(&self) -> Result<String, ProntuarioError> {
        self.require_session()?;
        let db = self.db.lock()?;
        let records = db.list_records()?;
        Ok(snapshot::records_to_json(&records)?)
    }

    // =========================================================================
    // Patient Views
    // =========================================================================

    /// One summary per patient, in alphabetical order.
    pub fn list_patients(&self) -> Result<Vec<FfiPatientSummary>, ProntuarioError> {
        self.require_session()?;
        Ok(self.summaries()?.into_iter().map(Into::into).collect())
    }

    /// One summary per patient, most recent visit first.
    pub fn recent_patients(&self) -> Result<Vec<FfiPatientSummary>, ProntuarioError> {
        self.require_session()?;
        let mut summaries = self.summaries()?;
        sort_by_recent(&mut summaries);
        Ok(summaries.into_iter().map(Into::into).collect())
    }

    /// Patients whose name contains `query`, ignoring case.
    pub fn search_patients(&self, query: String) -> Result<Vec<FfiPatientSummary>, ProntuarioError> {
        self.require_session()?;
        let summaries = self.summaries()?;
        Ok(aggregate::search_summaries(&summaries, &query)
            .into_iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// All visits of a patient, newest first.
    pub fn patient_history(&self, name: String) -> Result<Vec<FfiVisitRecord>, ProntuarioError> {
        self.require_session()?;
        let db = self.db.lock()?;
        let visits = db.records_for_patient(&name)?;
        Ok(visits.into_iter().map(Into::into).collect())
    }

    /// Pairs of patient names that probably belong to the same person.
    pub fn similar_names(&self) -> Result<Vec<FfiSimilarNames>, ProntuarioError> {
        self.require_session()?;
        let summaries = self.summaries()?;
        Ok(aggregate::similar_names(&summaries, self.config.similar_name_threshold)
            .into_iter()
            .map(Into::into)
            .collect())
    }

    // =========================================================================
    // Financial
    // =========================================================================

    /// Revenue of a month as `"D,DD"`.
    pub fn monthly_total(&self, month: u32, year: i32) -> Result<String, ProntuarioError> {
        self.require_session()?;
        let db = self.db.lock()?;
        let records = db.list_records()?;
        Ok(aggregate::monthly_total(&records, month, year))
    }

    /// Twelve monthly totals for a year.
    pub fn yearly_breakdown(&self, year: i32) -> Result<Vec<FfiMonthTotal>, ProntuarioError> {
        self.require_session()?;
        let db = self.db.lock()?;
        let records = db.list_records()?;
        Ok(aggregate::yearly_breakdown(&records, year)
            .into_iter()
            .map(Into::into)
            .collect())
    }

    // =========================================================================
    // Appointments
    // =========================================================================

    /// Schedule an appointment. `date` is `YYYY-MM-DD`.
    pub fn create_appointment(
        &self,
        date: String,
        start_time: String,
        end_time: String,
        patient_name: String,
        location: String,
    ) -> Result<FfiAppointment, ProntuarioError> {
        self.require_session()?;
        let appointment = Appointment::new(date, start_time, end_time, patient_name, location);
        let db = self.db.lock()?;
        db.insert_appointment(&appointment)?;
        Ok(appointment.into())
    }

    /// Update an existing appointment.
    pub fn update_appointment(&self, appointment: FfiAppointment) -> Result<bool, ProntuarioError> {
        self.require_session()?;
        let db = self.db.lock()?;
        let existing = db
            .get_appointment(&appointment.id)?
            .ok_or_else(|| ProntuarioError::NotFound(appointment.id.clone()))?;
        let updated = Appointment {
            id: appointment.id,
            date: format::canonical_iso_date(&appointment.date).unwrap_or(appointment.date),
            start_time: appointment.start_time,
            end_time: appointment.end_time,
            patient_name: appointment.patient_name,
            location: appointment.location,
            created_at: existing.created_at,
        };
        Ok(db.update_appointment(&updated)?)
    }

    /// Delete an appointment.
    pub fn delete_appointment(&self, id: String) -> Result<bool, ProntuarioError> {
        self.require_session()?;
        let db = self.db.lock()?;
        Ok(db.delete_appointment(&id)?)
    }

    /// Appointments of a month, by day then start time.
    pub fn appointments_for_month(
        &self,
        year: i32,
        month: u32,
    ) -> Result<Vec<FfiAppointment>, ProntuarioError> {
        self.require_session()?;
        let db = self.db.lock()?;
        Ok(db
            .appointments_for_month(year, month)?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Export a patient's history as JSON.
    pub fn export_patient_json(&self, name: String) -> Result<String, ProntuarioError> {
        self.require_session()?;
        let db = self.db.lock()?;
        let export = self.exporter(&db).export_patient(&name)?;
        Ok(export.to_json()?)
    }

    /// Export a patient's history as CSV.
    pub fn export_patient_csv(&self, name: String) -> Result<String, ProntuarioError> {
        self.require_session()?;
        let db = self.db.lock()?;
        let export = self.exporter(&db).export_patient(&name)?;
        Ok(export.to_csv())
    }

    /// Export the financial report of a year as JSON.
    pub fn export_financial_json(&self, year: i32) -> Result<String, ProntuarioError> {
        self.require_session()?;
        let db = self.db.lock()?;
        let report = self.exporter(&db).financial_report(year)?;
        Ok(report.to_json()?)
    }

    /// Export the financial report of a year as CSV.
    pub fn export_financial_csv(&self, year: i32) -> Result<String, ProntuarioError> {
        self.require_session()?;
        let db = self.db.lock()?;
        let report = self.exporter(&db).financial_report(year)?;
        Ok(report.to_csv())
    }
}

impl ProntuarioCore {
    fn exporter<'a>(&self, db: &'a Database) -> RecordExporter<'a> {
        RecordExporter::new(db).with_practitioner(self.config.practitioner_name.clone())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

fn timestamp(value: Option<DateTime<Utc>>) -> Option<String> {
    value.map(|t| t.to_rfc3339())
}

/// Parse an optional label, treating blank text as absent.
fn parse_label<T>(value: Option<String>) -> Result<Option<T>, ProntuarioError>
where
    T: std::str::FromStr<Err = models::UnknownLabel>,
{
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(label) => Ok(Some(label.parse()?)),
    }
}

/// FFI-safe session.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSession {
    pub session_id: String,
    pub user: String,
    pub started_at: String,
    pub expires_at: String,
}

impl From<&Session> for FfiSession {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.session_id.clone(),
            user: session.user.clone(),
            started_at: session.started_at.to_rfc3339(),
            expires_at: session.expires_at.to_rfc3339(),
        }
    }
}

/// FFI-safe contact details.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiContact {
    pub cpf: Option<String>,
    pub birth_date: Option<String>,
    pub age: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<PatientContact> for FfiContact {
    fn from(contact: PatientContact) -> Self {
        Self {
            cpf: contact.cpf,
            birth_date: contact.birth_date,
            age: contact.age,
            address: contact.address,
            email: contact.email,
            phone: contact.phone,
        }
    }
}

impl From<FfiContact> for PatientContact {
    fn from(contact: FfiContact) -> Self {
        PatientContact {
            cpf: contact.cpf,
            birth_date: contact.birth_date,
            age: contact.age,
            address: contact.address,
            email: contact.email,
            phone: contact.phone,
        }
    }
}

/// Entry-form fields for creating or updating a record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisitInput {
    pub patient_name: String,
    pub visit_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub amount: Option<String>,
    pub visit_type: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub contact: FfiContact,
}

impl FfiVisitInput {
    fn apply_to(self, record: &mut VisitRecord) -> Result<(), ProntuarioError> {
        record.visit_type = parse_label(self.visit_type)?;
        record.status = parse_label(self.status)?;
        record.visit_date = self.visit_date;
        record.start_time = self.start_time;
        record.end_time = self.end_time;
        record.amount = self.amount;
        record.notes = self.notes;
        record.contact = self.contact.into();
        Ok(())
    }
}

/// FFI-safe visit record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisitRecord {
    pub id: String,
    pub patient_name: String,
    pub visit_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub amount: Option<String>,
    pub visit_type: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub contact: FfiContact,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<VisitRecord> for FfiVisitRecord {
    fn from(record: VisitRecord) -> Self {
        Self {
            id: record.id,
            patient_name: record.patient_name,
            visit_date: record.visit_date,
            start_time: record.start_time,
            end_time: record.end_time,
            amount: record.amount,
            visit_type: record.visit_type.map(|t| t.to_string()),
            status: record.status.map(|s| s.to_string()),
            notes: record.notes,
            contact: record.contact.into(),
            created_at: timestamp(record.created_at),
            updated_at: timestamp(record.updated_at),
        }
    }
}

/// FFI-safe patient summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientSummary {
    pub patient_name: String,
    pub visit_count: u32,
    pub latest: FfiVisitRecord,
}

impl From<PatientSummary> for FfiPatientSummary {
    fn from(summary: PatientSummary) -> Self {
        Self {
            patient_name: summary.patient_name,
            visit_count: summary.visit_count as u32,
            latest: summary.latest.into(),
        }
    }
}

/// FFI-safe monthly total.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMonthTotal {
    pub month: u32,
    pub visit_count: u32,
    /// `"D,DD"`
    pub total: String,
}

impl From<MonthTotal> for FfiMonthTotal {
    fn from(total: MonthTotal) -> Self {
        Self {
            month: total.month,
            visit_count: total.visit_count as u32,
            total: total.total(),
        }
    }
}

/// FFI-safe similar-name pair.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSimilarNames {
    pub first: String,
    pub second: String,
    pub similarity: f64,
}

impl From<aggregate::SimilarNames> for FfiSimilarNames {
    fn from(pair: aggregate::SimilarNames) -> Self {
        Self {
            first: pair.first,
            second: pair.second,
            similarity: pair.similarity,
        }
    }
}

/// FFI-safe appointment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppointment {
    pub id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub patient_name: String,
    pub location: String,
}

impl From<Appointment> for FfiAppointment {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            date: appointment.date,
            start_time: appointment.start_time,
            end_time: appointment.end_time,
            patient_name: appointment.patient_name,
            location: appointment.location,
        }
    }
}
