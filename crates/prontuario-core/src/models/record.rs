//! Visit record ("prontuário") models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::format::{parse_amount, parse_optional_visit_date};

/// Kind of visit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VisitType {
    Online,
    Presencial,
    Particular,
    Plano,
}

impl VisitType {
    pub const ALL: [VisitType; 4] = [
        VisitType::Online,
        VisitType::Presencial,
        VisitType::Particular,
        VisitType::Plano,
    ];

    /// Label as stored and displayed.
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitType::Online => "Online",
            VisitType::Presencial => "Presencial",
            VisitType::Particular => "Particular",
            VisitType::Plano => "Plano",
        }
    }
}

/// Treatment status of a visit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VisitStatus {
    #[serde(rename = "Em andamento")]
    InProgress,
    #[serde(rename = "Encerrado")]
    Closed,
}

impl VisitStatus {
    /// Label as stored and displayed.
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitStatus::InProgress => "Em andamento",
            VisitStatus::Closed => "Encerrado",
        }
    }
}

/// Error for labels that are not one of the known enum values.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown label: {0}")]
pub struct UnknownLabel(pub String);

impl FromStr for VisitType {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        VisitType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

impl FromStr for VisitStatus {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "em andamento" => Ok(VisitStatus::InProgress),
            "encerrado" => Ok(VisitStatus::Closed),
            _ => Err(UnknownLabel(s.to_string())),
        }
    }
}

impl fmt::Display for VisitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Patient contact details, repeated on every visit record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientContact {
    /// CPF in `DDD.DDD.DDD-DD` form
    pub cpf: Option<String>,
    /// Date of birth, `DD/MM/YYYY`
    pub birth_date: Option<String>,
    /// Age as typed
    pub age: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    /// Mobile phone in `(DD) D DDDD-DDDD` form
    pub phone: Option<String>,
}

/// Entry-form validation failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Patient name is required")]
    MissingPatientName,

    #[error("Visit date is required")]
    MissingVisitDate,

    #[error("Invalid e-mail: {0}")]
    InvalidEmail(String),

    #[error("Required field missing: {0}")]
    MissingField(&'static str),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// A clinical/billing encounter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisitRecord {
    /// Identifier assigned at creation; never changes
    pub id: String,
    /// Free-text patient name, the de facto grouping key
    pub patient_name: String,
    /// `DD/MM/YYYY`
    pub visit_date: Option<String>,
    /// `HHh MMmin`
    pub start_time: Option<String>,
    /// `HHh MMmin`
    pub end_time: Option<String>,
    /// `R$ D,DD`
    pub amount: Option<String>,
    pub visit_type: Option<VisitType>,
    pub status: Option<VisitStatus>,
    /// Clinical notes ("evolução")
    pub notes: Option<String>,
    pub contact: PatientContact,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl VisitRecord {
    /// Create a new record with a fresh ID and creation timestamp.
    pub fn new(patient_name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_name,
            visit_date: None,
            start_time: None,
            end_time: None,
            amount: None,
            visit_type: None,
            status: None,
            notes: None,
            contact: PatientContact::default(),
            created_at: Some(Utc::now()),
            updated_at: None,
        }
    }

    /// Patient name with surrounding whitespace removed, `None` when blank.
    pub fn patient_key(&self) -> Option<&str> {
        let trimmed = self.patient_name.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }

    /// Parsed visit date, `None` when empty or malformed.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_optional_visit_date(self.visit_date.as_deref())
    }

    /// Parsed amount; missing or unparseable amounts count as zero.
    pub fn amount_value(&self) -> f64 {
        self.amount.as_deref().map(parse_amount).unwrap_or(0.0)
    }

    /// Check the fields the entry form requires.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.patient_key().is_none() {
            return Err(ValidationError::MissingPatientName);
        }
        if self
            .visit_date
            .as_deref()
            .map_or(true, |d| d.trim().is_empty())
        {
            return Err(ValidationError::MissingVisitDate);
        }
        if let Some(email) = self.contact.email.as_deref() {
            if !email.trim().is_empty() && !email.contains('@') {
                return Err(ValidationError::InvalidEmail(email.to_string()));
            }
        }
        Ok(())
    }
}
