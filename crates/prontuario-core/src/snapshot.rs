//! Document-store snapshots.
//!
//! A snapshot is a JSON object mapping document IDs to record fields, with
//! the field names used by the hosted store:
//!
//! ```json
//! {
//!   "abc123": {
//!     "paciente": "Ana Souza",
//!     "data": "01/02/2024",
//!     "valor": "R$ 150,00",
//!     "tipoAtendimento": "Online",
//!     "criadoEm": { "seconds": 1706783400, "nanoseconds": 0 }
//!   }
//! }
//! ```
//!
//! Fields may be missing, null, strings or numbers. Blank strings become `None`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::format::non_blank;
use crate::models::{PatientContact, VisitRecord, VisitStatus, VisitType};

/// Timestamp as found in snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Seconds {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds")]
        nanoseconds: u32,
    },
    Text(String),
    Other(Value),
}

impl RawTimestamp {
    fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            RawTimestamp::Seconds {
                seconds,
                nanoseconds,
            } => DateTime::from_timestamp(*seconds, *nanoseconds),
            RawTimestamp::Text(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            RawTimestamp::Other(_) => None,
        }
    }
}

/// Record fields under their store names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct RawRecord {
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    paciente: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    data: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    inicio: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    fim: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    valor: Option<String>,
    #[serde(
        rename = "tipoAtendimento",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    tipo_atendimento: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    evolucao: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    cpf: Option<String>,
    #[serde(
        rename = "dataNascimento",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    data_nascimento: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    idade: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    endereco: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    celular: Option<String>,
    #[serde(rename = "criadoEm", skip_serializing_if = "Option::is_none")]
    criado_em: Option<RawTimestamp>,
    #[serde(rename = "atualizadoEm", skip_serializing_if = "Option::is_none")]
    atualizado_em: Option<RawTimestamp>,
}

/// Accept strings, numbers and booleans; blank strings and null become `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => non_blank(&s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

impl RawRecord {
    fn into_record(self, id: String) -> VisitRecord {
        let visit_type = self.tipo_atendimento.as_deref().and_then(|label| {
            label
                .parse::<VisitType>()
                .map_err(|e| tracing::warn!(record_id = %id, error = %e, "Ignoring visit type"))
                .ok()
        });
        let status = self.status.as_deref().and_then(|label| {
            label
                .parse::<VisitStatus>()
                .map_err(|e| tracing::warn!(record_id = %id, error = %e, "Ignoring visit status"))
                .ok()
        });

        VisitRecord {
            patient_name: self.paciente.unwrap_or_default(),
            visit_date: self.data,
            start_time: self.inicio,
            end_time: self.fim,
            amount: self.valor,
            visit_type,
            status,
            notes: self.evolucao,
            contact: PatientContact {
                cpf: self.cpf,
                birth_date: self.data_nascimento,
                age: self.idade,
                address: self.endereco,
                email: self.email,
                phone: self.celular,
            },
            created_at: self.criado_em.as_ref().and_then(RawTimestamp::to_datetime),
            updated_at: self.atualizado_em.as_ref().and_then(RawTimestamp::to_datetime),
            id,
        }
    }

    fn from_record(record: &VisitRecord) -> Self {
        let contact = &record.contact;
        Self {
            paciente: non_blank(&record.patient_name),
            data: record.visit_date.clone(),
            inicio: record.start_time.clone(),
            fim: record.end_time.clone(),
            valor: record.amount.clone(),
            tipo_atendimento: record.visit_type.map(|t| t.as_str().to_string()),
            status: record.status.map(|s| s.as_str().to_string()),
            evolucao: record.notes.clone(),
            cpf: contact.cpf.clone(),
            data_nascimento: contact.birth_date.clone(),
            idade: contact.age.clone(),
            endereco: contact.address.clone(),
            email: contact.email.clone(),
            celular: contact.phone.clone(),
            criado_em: record.created_at.map(|t| RawTimestamp::Text(t.to_rfc3339())),
            atualizado_em: record.updated_at.map(|t| RawTimestamp::Text(t.to_rfc3339())),
        }
    }
}

/// Parse a snapshot into records, ordered by document ID.
pub fn records_from_json(json: &str) -> Result<Vec<VisitRecord>, serde_json::Error> {
    let raw: BTreeMap<String, RawRecord> = serde_json::from_str(json)?;
    let records: Vec<VisitRecord> = raw
        .into_iter()
        .map(|(id, fields)| fields.into_record(id))
        .collect();
    tracing::debug!(count = records.len(), "Parsed snapshot");
    Ok(records)
}

/// Serialize records back into snapshot form.
pub fn records_to_json(records: &[VisitRecord]) -> Result<String, serde_json::Error> {
    let raw: BTreeMap<&str, RawRecord> = records
        .iter()
        .map(|r| (r.id.as_str(), RawRecord::from_record(r)))
        .collect();
    serde_json::to_string_pretty(&raw)
}
