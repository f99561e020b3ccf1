//! Report card domain: student records, the weighted scoring engine and the
//! record service that persists scored snapshots through a [`records::StudentStore`].

pub mod error;
pub mod records;
pub mod scoring;
pub mod types;
pub mod validation;
pub mod weights;
