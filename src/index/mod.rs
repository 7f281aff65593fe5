//! Student index subsystem
//!
//! An index is built once from a sequence of records and is read-only
//! afterwards.
//!
//! # Design Principles
//!
//! - One primary map (`student_id -> record`) owns the records
//! - Secondary indexes (name, program+year, class) store ids only
//! - Construction is all-or-nothing
//! - Absence at query time is an empty result, not an error

mod errors;
mod record;
mod student_index;

pub use errors::{IndexError, IndexErrorCode, IndexResult};
pub use record::{ClassId, ProgramEnrollment, RawRecord, StudentId, StudentRecord};
pub use student_index::{IndexStats, StudentIndex};
