//! Visit record database operations.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::aggregate::patient_history;
use crate::format::display_to_iso;
use crate::models::{PatientContact, VisitRecord};

const RECORD_COLUMNS: &str = "id, paciente, data, inicio, fim, valor, tipo_atendimento, status, \
     evolucao, cpf, data_nascimento, idade, endereco, email, celular, criado_em, atualizado_em";

fn parse_timestamp(value: Option<String>) -> Option<DateTime<Utc>> {
    value
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<VisitRecord> {
    let visit_type: Option<String> = row.get(6)?;
    let status: Option<String> = row.get(7)?;

    Ok(VisitRecord {
        id: row.get(0)?,
        patient_name: row.get(1)?,
        visit_date: row.get(2)?,
        start_time: row.get(3)?,
        end_time: row.get(4)?,
        amount: row.get(5)?,
        visit_type: visit_type.and_then(|t| t.parse().ok()),
        status: status.and_then(|s| s.parse().ok()),
        notes: row.get(8)?,
        contact: PatientContact {
            cpf: row.get(9)?,
            birth_date: row.get(10)?,
            age: row.get(11)?,
            address: row.get(12)?,
            email: row.get(13)?,
            phone: row.get(14)?,
        },
        created_at: parse_timestamp(row.get(15)?),
        updated_at: parse_timestamp(row.get(16)?),
    })
}

/// Insert (or replace, depending on `verb`) a full record row.
fn write_record(conn: &Connection, verb: &str, record: &VisitRecord) -> DbResult<()> {
    let contact = &record.contact;
    conn.execute(
        &format!(
            "{} INTO prontuarios (
                id, paciente, data, data_iso, inicio, fim, valor, tipo_atendimento, status,
                evolucao, cpf, data_nascimento, idade, endereco, email, celular,
                criado_em, atualizado_em
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
            verb
        ),
        params![
            record.id,
            record.patient_name,
            record.visit_date,
            record.visit_date.as_deref().and_then(display_to_iso),
            record.start_time,
            record.end_time,
            record.amount,
            record.visit_type.map(|t| t.as_str()),
            record.status.map(|s| s.as_str()),
            record.notes,
            contact.cpf,
            contact.birth_date,
            contact.age,
            contact.address,
            contact.email,
            contact.phone,
            record.created_at.map(|t| t.to_rfc3339()),
            record.updated_at.map(|t| t.to_rfc3339()),
        ],
    )?;
    Ok(())
}

impl Database {
    /// Insert a new record after entry-form validation.
    pub fn insert_record(&self, record: &VisitRecord) -> DbResult<()> {
        record.validate()?;
        write_record(&self.conn, "INSERT", record)?;
        tracing::debug!(record_id = %record.id, "Inserted record");
        Ok(())
    }

    /// Replace the local copy with a snapshot, keeping records as delivered.
    ///
    /// Snapshot records are not validated: incomplete records still exist in
    /// the raw record set.
    pub fn import_records(&mut self, records: &[VisitRecord]) -> DbResult<usize> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM prontuarios", [])?;
        for record in records {
            write_record(&tx, "INSERT OR REPLACE", record)?;
        }
        tx.commit()?;
        tracing::info!(count = records.len(), "Imported snapshot");
        Ok(records.len())
    }

    /// Update an existing record. Returns false when the ID is unknown.
    pub fn update_record(&self, record: &VisitRecord) -> DbResult<bool> {
        record.validate()?;
        let contact = &record.contact;
        let rows_affected = self.conn.execute(
            r#"
            UPDATE prontuarios SET
                paciente = ?2, data = ?3, data_iso = ?4, inicio = ?5, fim = ?6, valor = ?7,
                tipo_atendimento = ?8, status = ?9, evolucao = ?10, cpf = ?11,
                data_nascimento = ?12, idade = ?13, endereco = ?14, email = ?15, celular = ?16,
                atualizado_em = ?17
            WHERE id = ?1
            "#,
            params![
                record.id,
                record.patient_name,
                record.visit_date,
                record.visit_date.as_deref().and_then(display_to_iso),
                record.start_time,
                record.end_time,
                record.amount,
                record.visit_type.map(|t| t.as_str()),
                record.status.map(|s| s.as_str()),
                record.notes,
                contact.cpf,
                contact.birth_date,
                contact.age,
                contact.address,
                contact.email,
                contact.phone,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Update only the contact fields of a record.
    pub fn update_contact(&self, id: &str, contact: &PatientContact) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE prontuarios SET
                cpf = ?2, data_nascimento = ?3, idade = ?4, endereco = ?5, email = ?6,
                celular = ?7, atualizado_em = ?8
            WHERE id = ?1
            "#,
            params![
                id,
                contact.cpf,
                contact.birth_date,
                contact.age,
                contact.address,
                contact.email,
                contact.phone,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a record by ID.
    pub fn get_record(&self, id: &str) -> DbResult<Option<VisitRecord>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM prontuarios WHERE id = ?", RECORD_COLUMNS),
                [id],
                record_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Full snapshot of the record set, ordered by ID.
    pub fn list_records(&self) -> DbResult<Vec<VisitRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM prontuarios ORDER BY id", RECORD_COLUMNS))?;
        let rows = stmt.query_map([], record_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Records of one patient (trimmed name match), newest first.
    pub fn records_for_patient(&self, name: &str) -> DbResult<Vec<VisitRecord>> {
        let records = self.list_records()?;
        Ok(patient_history(&records, name).visits)
    }

    /// Delete a single record.
    pub fn delete_record(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM prontuarios WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Delete every record of a patient (trimmed name match). Blank names delete nothing.
    pub fn delete_records_for_patient(&self, name: &str) -> DbResult<usize> {
        let mut deleted = 0;
        for record in self.records_for_patient(name)? {
            if self.delete_record(&record.id)? {
                deleted += 1;
            }
        }
        tracing::info!(patient = name.trim(), deleted, "Deleted patient records");
        Ok(deleted)
    }
}
