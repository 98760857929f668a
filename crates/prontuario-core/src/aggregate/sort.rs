//! Chronological ordering of records and summaries.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};

use super::collate::compare_pt_br;
use crate::models::{PatientSummary, VisitRecord};

/// Anything that can be placed on the visit timeline.
pub trait Dated {
    /// Visit date; `None` when missing or malformed.
    fn sort_date(&self) -> Option<NaiveDate>;
    /// Name used to break ties between equal dates.
    fn sort_name(&self) -> &str;
    /// Creation timestamp, last tie-break.
    fn sort_created_at(&self) -> Option<DateTime<Utc>>;
}

impl Dated for VisitRecord {
    fn sort_date(&self) -> Option<NaiveDate> {
        self.parsed_date()
    }

    fn sort_name(&self) -> &str {
        self.patient_name.trim()
    }

    fn sort_created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl Dated for PatientSummary {
    fn sort_date(&self) -> Option<NaiveDate> {
        self.latest.parsed_date()
    }

    fn sort_name(&self) -> &str {
        &self.patient_name
    }

    fn sort_created_at(&self) -> Option<DateTime<Utc>> {
        self.latest.created_at
    }
}

/// Most recent date first, then name ascending, then newest creation first.
///
/// `None` dates compare below every real date, so they end up last.
pub fn compare_recent<T: Dated>(a: &T, b: &T) -> Ordering {
    b.sort_date()
        .cmp(&a.sort_date())
        .then_with(|| compare_pt_br(a.sort_name(), b.sort_name()))
        .then_with(|| b.sort_created_at().cmp(&a.sort_created_at()))
}

/// Newest creation timestamp first, falling back to the visit date.
pub fn compare_created<T: Dated>(a: &T, b: &T) -> Ordering {
    b.sort_created_at()
        .cmp(&a.sort_created_at())
        .then_with(|| b.sort_date().cmp(&a.sort_date()))
}

/// Stable sort, most recent visit first.
pub fn sort_by_recent<T: Dated>(items: &mut [T]) {
    items.sort_by(compare_recent::<T>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(name: &str, date: &str) -> VisitRecord {
        let mut r = VisitRecord::new(name.into());
        r.visit_date = Some(date.into());
        r.created_at = None;
        r
    }

    fn names(records: &[VisitRecord]) -> Vec<&str> {
        records.iter().map(|r| r.patient_name.as_str()).collect()
    }

    #[test]
    fn test_date_desc_name_tie_break() {
        let mut records = vec![
            record("Carla", "15/01/2024"),
            record("Bruno", "01/02/2024"),
            record("Ana", "01/02/2024"),
        ];
        sort_by_recent(&mut records);
        assert_eq!(names(&records), vec!["Ana", "Bruno", "Carla"]);
    }

    #[test]
    fn test_unparseable_dates_sort_last() {
        let mut records = vec![
            record("Ana", ""),
            record("Bruno", "01/01/1900"),
            record("Carla", "xx/yy/zzzz"),
            record("Davi", "10/10/2023"),
        ];
        sort_by_recent(&mut records);
        assert_eq!(names(&records), vec!["Davi", "Bruno", "Ana", "Carla"]);
    }

    #[test]
    fn test_created_at_breaks_remaining_ties() {
        let mut older = record("Ana", "01/02/2024");
        older.id = "older".into();
        older.created_at = Some(Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap());
        let mut newer = record("Ana", "01/02/2024");
        newer.id = "newer".into();
        newer.created_at = Some(Utc.with_ymd_and_hms(2024, 2, 1, 15, 0, 0).unwrap());

        let mut sorted = vec![older, newer];
        sort_by_recent(&mut sorted);
        assert_eq!(sorted[0].id, "newer");
        assert_eq!(sorted[1].id, "older");
    }

    #[test]
    fn test_stable_for_full_ties() {
        let mut a = record("Ana", "01/02/2024");
        a.id = "first".into();
        let mut b = record("Ana", "01/02/2024");
        b.id = "second".into();

        let mut sorted = vec![a, b];
        sort_by_recent(&mut sorted);
        assert_eq!(sorted[0].id, "first");
        assert_eq!(sorted[1].id, "second");
    }

    #[test]
    fn test_compare_created() {
        let mut a = record("Ana", "01/01/2024");
        a.created_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let b = record("Ana", "05/01/2024"); // no timestamp

        assert_eq!(compare_created(&a, &b), Ordering::Less);
    }
}
