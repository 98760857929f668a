//! Per-patient history and patient search.

use super::sort::compare_created;
use crate::models::{PatientHistory, PatientSummary, VisitRecord};

/// All records whose trimmed name equals the trimmed `name`, newest first.
pub fn patient_history(records: &[VisitRecord], name: &str) -> PatientHistory {
    let key = name.trim();
    let mut visits: Vec<VisitRecord> = records
        .iter()
        .filter(|r| !key.is_empty() && r.patient_key() == Some(key))
        .cloned()
        .collect();
    visits.sort_by(compare_created::<VisitRecord>);

    PatientHistory {
        patient_name: key.to_string(),
        visits,
    }
}

/// Summaries whose name contains `query`, ignoring case. An empty query keeps all.
pub fn search_summaries<'a>(summaries: &'a [PatientSummary], query: &str) -> Vec<&'a PatientSummary> {
    let needle = query.trim().to_lowercase();
    summaries
        .iter()
        .filter(|s| s.patient_name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::deduplicate_patients;
    use chrono::{TimeZone, Utc};

    fn record(id: &str, name: &str, hour: u32) -> VisitRecord {
        let mut r = VisitRecord::new(name.into());
        r.id = id.into();
        r.created_at = Some(Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap());
        r
    }

    #[test]
    fn test_history_filters_and_orders() {
        let records = vec![
            record("a1", "Ana", 8),
            record("b1", "Bruno", 9),
            record("a2", " Ana ", 12),
            record("a3", "Ana", 10),
        ];

        let history = patient_history(&records, "Ana ");
        assert_eq!(history.patient_name, "Ana");
        let ids: Vec<&str> = history.visits.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["a2", "a3", "a1"]);
    }

    #[test]
    fn test_history_unknown_or_blank_name() {
        let records = vec![record("a1", "Ana", 8), record("x", "  ", 9)];
        assert!(patient_history(&records, "Carla").is_empty());
        assert!(patient_history(&records, "  ").is_empty());
    }

    #[test]
    fn test_search_summaries() {
        let records = vec![
            record("1", "Ana Souza", 8),
            record("2", "Mariana", 8),
            record("3", "Bruno", 8),
        ];
        let summaries = deduplicate_patients(&records);

        let found: Vec<&str> = search_summaries(&summaries, "ANA")
            .into_iter()
            .map(|s| s.patient_name.as_str())
            .collect();
        assert_eq!(found, vec!["Ana Souza", "Mariana"]);
        assert_eq!(search_summaries(&summaries, "").len(), 3);
        assert!(search_summaries(&summaries, "zz").is_empty());
    }
}
