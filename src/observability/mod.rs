//! Observability for rosterdb
//!
//! Structured JSON logging plus scope-based lifecycle events. Observability is
//! read-only: nothing here influences index contents or query results.
//!
//! ```ignore
//! use rosterdb::observability::{Logger, ObservationScope};
//!
//! Logger::info("STUDENT_INDEX_READY", &[("records", "5")]);
//!
//! let scope = ObservationScope::new("STUDENT_INDEX_BUILD");
//! // ... do work ...
//! scope.complete();
//! ```

mod logger;
mod scope;

pub use logger::{Logger, Severity};
pub use scope::ObservationScope;
