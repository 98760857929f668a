//! Derived views over a snapshot of visit records.
//!
//! Everything here is a pure function of its input list. Callers recompute
//! the views whenever a new snapshot arrives.
//!
//! - [`dedup`]: one summary per patient name
//! - [`monthly`]: monthly and yearly revenue totals
//! - [`sort`]: chronological ordering
//! - [`collate`]: pt-BR string ordering
//! - [`history`]: per-patient history and search
//! - [`duplicates`]: similar-name report

pub mod collate;
pub mod dedup;
pub mod duplicates;
pub mod history;
pub mod monthly;
pub mod sort;

pub use collate::{compare_pt_br, fold_name};
pub use dedup::deduplicate_patients;
pub use duplicates::{similar_names, SimilarNames, DEFAULT_SIMILARITY_THRESHOLD};
pub use history::{patient_history, search_summaries};
pub use monthly::{
    month_total, monthly_sum, monthly_total, yearly_breakdown, yearly_cents, yearly_sum,
    MonthTotal,
};
pub use sort::{compare_created, compare_recent, sort_by_recent, Dated};
