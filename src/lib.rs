//! rosterdb - An immutable in-memory index over student records
//!
//! Records are indexed once by id, name, program+year and class, then
//! queried without further mutation.
//!
//! ```ignore
//! use rosterdb::fixtures::sample_records;
//! use rosterdb::index::StudentIndex;
//!
//! let index = StudentIndex::build(sample_records())?;
//! assert_eq!(index.find_by_name("Jane Doe").len(), 2);
//! ```

pub mod config;
pub mod fixtures;
pub mod index;
pub mod observability;
