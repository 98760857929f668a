//! Report of patient names that probably belong to the same person.
//!
//! Patients are keyed by free-text name, so "Joao da Silva" and "João da Silva"
//! become two patients. Nothing here merges them; the report is for review.

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

use super::collate::fold_name;
use crate::models::PatientSummary;

/// Default similarity threshold for the report.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.92;

/// Two patient names that look alike.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarNames {
    pub first: String,
    pub second: String,
    /// Jaro-Winkler similarity of the folded names (0.0 - 1.0)
    pub similarity: f64,
}

/// Collapse whitespace and fold case/accents.
fn comparable(name: &str) -> String {
    fold_name(name).split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pairs of summaries whose names reach `threshold`, most similar first.
pub fn similar_names(summaries: &[PatientSummary], threshold: f64) -> Vec<SimilarNames> {
    let folded: Vec<String> = summaries
        .iter()
        .map(|s| comparable(&s.patient_name))
        .collect();

    let mut pairs = Vec::new();
    for i in 0..summaries.len() {
        for j in (i + 1)..summaries.len() {
            let similarity = jaro_winkler(&folded[i], &folded[j]);
            if similarity >= threshold {
                pairs.push(SimilarNames {
                    first: summaries[i].patient_name.clone(),
                    second: summaries[j].patient_name.clone(),
                    similarity,
                });
            }
        }
    }

    pairs.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::deduplicate_patients;
    use crate::models::VisitRecord;

    fn summaries(names: &[&str]) -> Vec<PatientSummary> {
        let records: Vec<VisitRecord> = names
            .iter()
            .map(|n| VisitRecord::new((*n).to_string()))
            .collect();
        deduplicate_patients(&records)
    }

    #[test]
    fn test_accent_and_case_variants_reported() {
        let s = summaries(&["João da Silva", "joao da silva", "Bruno Costa"]);
        let pairs = similar_names(&s, DEFAULT_SIMILARITY_THRESHOLD);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].similarity, 1.0);
        assert!(pairs.iter().all(|p| p.first != "Bruno Costa" && p.second != "Bruno Costa"));
    }

    #[test]
    fn test_typo_reported() {
        let s = summaries(&["Mariana Oliveira", "Mariana Olivera"]);
        let pairs = similar_names(&s, DEFAULT_SIMILARITY_THRESHOLD);
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].similarity < 1.0);
    }

    #[test]
    fn test_distinct_names_not_reported() {
        let s = summaries(&["Ana", "Bruno", "Carla"]);
        assert!(similar_names(&s, DEFAULT_SIMILARITY_THRESHOLD).is_empty());
    }

    #[test]
    fn test_extra_spaces_ignored() {
        assert_eq!(comparable("  Ana   Souza "), "ana souza");
    }
}
