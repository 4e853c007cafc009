//! omni-core
//!
//! Pure domain types for the patient-reported-outcomes dashboard: the
//! assessment profile, category scores, question responses, historical
//! trends, and the chat transcript vocabulary shared by every other crate.
//! No AWS SDK dependency.

pub mod dataset;
pub mod error;
pub mod filter;
pub mod models;
pub mod storage_keys;
