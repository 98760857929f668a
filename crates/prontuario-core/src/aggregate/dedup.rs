//! Grouping of visit records into one summary per patient name.

use std::collections::HashMap;

use super::collate::compare_pt_br;
use crate::models::{PatientSummary, VisitRecord};

/// One summary per distinct trimmed, non-blank patient name.
///
/// Keeps the record with the latest visit date for each name. A later record
/// only replaces the current one when its date is strictly greater, so the
/// first record seen wins ties. Missing or malformed dates rank below every
/// real date. Names are compared verbatim after trimming: no case or accent
/// folding. Output is ordered by name (pt-BR collation).
pub fn deduplicate_patients(records: &[VisitRecord]) -> Vec<PatientSummary> {
    // name -> (index of best record, visit count)
    let mut best: HashMap<&str, (usize, usize)> = HashMap::new();
    let mut skipped = 0usize;

    for (index, record) in records.iter().enumerate() {
        let Some(name) = record.patient_key() else {
            skipped += 1;
            continue;
        };

        best.entry(name)
            .and_modify(|(current, count)| {
                *count += 1;
                if record.parsed_date() > records[*current].parsed_date() {
                    *current = index;
                }
            })
            .or_insert((index, 1));
    }

    if skipped > 0 {
        tracing::debug!(skipped, "Records without patient name left out of summaries");
    }

    let mut summaries: Vec<PatientSummary> = best
        .into_iter()
        .map(|(name, (index, visit_count))| PatientSummary {
            patient_name: name.to_string(),
            latest: records[index].clone(),
            visit_count,
        })
        .collect();

    summaries.sort_by(|a, b| compare_pt_br(&a.patient_name, &b.patient_name));
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str, date: Option<&str>) -> VisitRecord {
        let mut r = VisitRecord::new(name.into());
        r.id = id.into();
        r.visit_date = date.map(Into::into);
        r
    }

    #[test]
    fn test_empty_input() {
        assert!(deduplicate_patients(&[]).is_empty());
    }

    #[test]
    fn test_keeps_most_recent_per_name() {
        let records = vec![
            record("1", "Ana", Some("10/01/2024")),
            record("2", "Bruno", Some("05/03/2024")),
            record("3", "Ana", Some("02/02/2024")),
            record("4", "Ana", Some("31/12/2023")),
        ];

        let summaries = deduplicate_patients(&records);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].patient_name, "Ana");
        assert_eq!(summaries[0].latest.id, "3");
        assert_eq!(summaries[0].visit_count, 3);
        assert_eq!(summaries[1].patient_name, "Bruno");
        assert_eq!(summaries[1].visit_count, 1);
    }

    #[test]
    fn test_calendar_order_not_display_order() {
        // "01/12/2023" > "31/01/2024" as display strings, but not as dates.
        let records = vec![
            record("old", "Ana", Some("01/12/2023")),
            record("new", "Ana", Some("31/01/2024")),
        ];
        let summaries = deduplicate_patients(&records);
        assert_eq!(summaries[0].latest.id, "new");
    }

    #[test]
    fn test_first_seen_wins_ties() {
        let records = vec![
            record("first", "Ana", Some("01/02/2024")),
            record("second", "Ana", Some("01/02/2024")),
        ];
        assert_eq!(deduplicate_patients(&records)[0].latest.id, "first");
    }

    #[test]
    fn test_dated_record_beats_undated() {
        let records = vec![
            record("undated", "Ana", None),
            record("dated", "Ana", Some("01/02/2024")),
            record("malformed", "Ana", Some("99/99/9999")),
        ];
        assert_eq!(deduplicate_patients(&records)[0].latest.id, "dated");
    }

    #[test]
    fn test_names_trimmed_but_not_folded() {
        let records = vec![
            record("1", "  Ana ", Some("01/01/2024")),
            record("2", "Ana", Some("02/01/2024")),
            record("3", "ana", Some("03/01/2024")),
            record("4", "", Some("04/01/2024")),
            record("5", "   ", Some("05/01/2024")),
        ];

        let summaries = deduplicate_patients(&records);
        let names: Vec<&str> = summaries.iter().map(|s| s.patient_name.as_str()).collect();
        assert_eq!(names, vec!["ana", "Ana"]);
        assert_eq!(summaries[1].visit_count, 2);
        assert_eq!(summaries[1].latest.id, "2");
    }

    #[test]
    fn test_output_uses_locale_order() {
        let records = vec![
            record("1", "Zélia", None),
            record("2", "Érica", None),
            record("3", "Bruno", None),
        ];
        let names: Vec<String> = deduplicate_patients(&records)
            .into_iter()
            .map(|s| s.patient_name)
            .collect();
        assert_eq!(names, vec!["Bruno", "Érica", "Zélia"]);
    }
}
