//! Appointment database operations.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::format::month_bounds;
use crate::models::Appointment;

fn appointment_from_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    let created_at: String = row.get(6)?;
    Ok(Appointment {
        id: row.get(0)?,
        date: row.get(1)?,
        start_time: row.get(2)?,
        end_time: row.get(3)?,
        patient_name: row.get(4)?,
        location: row.get(5)?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
            })?,
    })
}

impl Database {
    /// Insert a new appointment. All fields are required.
    pub fn insert_appointment(&self, appointment: &Appointment) -> DbResult<()> {
        appointment.validate()?;
        self.conn.execute(
            r#"
            INSERT INTO agendamentos (id, data, inicio, fim, paciente, local, criado_em)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                appointment.id,
                appointment.date,
                appointment.start_time,
                appointment.end_time,
                appointment.patient_name,
                appointment.location,
                appointment.created_at.to_rfc3339(),
            ],
        )?;
        tracing::debug!(appointment_id = %appointment.id, date = %appointment.date, "Inserted appointment");
        Ok(())
    }

    /// Update an existing appointment. Returns false when the ID is unknown.
    pub fn update_appointment(&self, appointment: &Appointment) -> DbResult<bool> {
        appointment.validate()?;
        let rows_affected = self.conn.execute(
            r#"
            UPDATE agendamentos SET
                data = ?2, inicio = ?3, fim = ?4, paciente = ?5, local = ?6
            WHERE id = ?1
            "#,
            params![
                appointment.id,
                appointment.date,
                appointment.start_time,
                appointment.end_time,
                appointment.patient_name,
                appointment.location,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get an appointment by ID.
    pub fn get_appointment(&self, id: &str) -> DbResult<Option<Appointment>> {
        self.conn
            .query_row(
                r#"
                SELECT id, data, inicio, fim, paciente, local, criado_em
                FROM agendamentos
                WHERE id = ?
                "#,
                [id],
                appointment_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Appointments of a month, ordered by day then start time.
    pub fn appointments_for_month(&self, year: i32, month: u32) -> DbResult<Vec<Appointment>> {
        let (first, last) = month_bounds(year, month)
            .ok_or_else(|| DbError::Constraint(format!("Invalid month: {}-{:02}", year, month)))?;

        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, data, inicio, fim, paciente, local, criado_em
            FROM agendamentos
            WHERE data >= ?1 AND data <= ?2
            ORDER BY data ASC, inicio ASC
            "#,
        )?;
        let rows = stmt.query_map(params![first, last], appointment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete an appointment.
    pub fn delete_appointment(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM agendamentos WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}
