//! Appointment ("agendamento") models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::ValidationError;
use crate::format::{canonical_iso_date, iso_to_display};

/// A scheduled appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    /// Unique appointment ID
    pub id: String,
    /// Calendar day, `YYYY-MM-DD`
    pub date: String,
    /// `HHh MMmin`
    pub start_time: String,
    /// `HHh MMmin`
    pub end_time: String,
    pub patient_name: String,
    /// Where the appointment happens (office, online room, ...)
    pub location: String,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Create a new appointment with a fresh ID. A parseable date is stored zero-padded.
    pub fn new(
        date: String,
        start_time: String,
        end_time: String,
        patient_name: String,
        location: String,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date: canonical_iso_date(&date).unwrap_or(date),
            start_time,
            end_time,
            patient_name,
            location,
            created_at: Utc::now(),
        }
    }

    /// Date in `DD/MM/YYYY` form.
    pub fn display_date(&self) -> String {
        iso_to_display(&self.date)
    }

    /// All fields are required; the date must be a real calendar day in
    /// zero-padded `YYYY-MM-DD` form, since month listings compare it as text.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            ("date", &self.date),
            ("start_time", &self.start_time),
            ("end_time", &self.end_time),
            ("patient_name", &self.patient_name),
            ("location", &self.location),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }
        if canonical_iso_date(&self.date).as_deref() != Some(self.date.as_str()) {
            return Err(ValidationError::InvalidDate(self.date.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make() -> Appointment {
        Appointment::new(
            "2025-03-07".into(),
            "09h 00min".into(),
            "10h 00min".into(),
            "Ana".into(),
            "Consultório".into(),
        )
    }

    #[test]
    fn test_valid_appointment() {
        let a = make();
        assert!(a.validate().is_ok());
        assert_eq!(a.display_date(), "07/03/2025");
    }

    #[test]
    fn test_missing_fields() {
        let mut a = make();
        a.location = " ".into();
        assert_eq!(a.validate(), Err(ValidationError::MissingField("location")));

        let mut a = make();
        a.start_time = String::new();
        assert_eq!(a.validate(), Err(ValidationError::MissingField("start_time")));
    }

    #[test]
    fn test_invalid_date() {
        let mut a = make();
        a.date = "07/03/2025".into();
        assert!(matches!(a.validate(), Err(ValidationError::InvalidDate(_))));
    }

    #[test]
    fn test_unpadded_date_is_canonicalised() {
        let a = Appointment::new(
            "2025-3-7".into(),
            "09h 00min".into(),
            "10h 00min".into(),
            "Ana".into(),
            "Consultório".into(),
        );
        assert_eq!(a.date, "2025-03-07");
        assert!(a.validate().is_ok());

        let mut b = make();
        b.date = "2025-3-7".into();
        assert!(matches!(b.validate(), Err(ValidationError::InvalidDate(_))));
        b.date = " 2025-03-07".into();
        assert!(matches!(b.validate(), Err(ValidationError::InvalidDate(_))));
    }
}
