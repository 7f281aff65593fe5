//! Index error types
//!
//! Error codes:
//! - ROSTER_DUPLICATE_ID (FATAL)
//! - ROSTER_MALFORMED_RECORD (FATAL)
//!
//! Both are construction-time failures; a failed build yields no index.
//! Query-time absence is never an error.

use std::fmt;

use thiserror::Error;

use super::record::StudentId;

/// Index-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexErrorCode {
    /// Two input records share a student id
    RosterDuplicateId,
    /// An input record is missing a required field or has a wrongly typed one
    RosterMalformedRecord,
}

impl IndexErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            IndexErrorCode::RosterDuplicateId => "ROSTER_DUPLICATE_ID",
            IndexErrorCode::RosterMalformedRecord => "ROSTER_MALFORMED_RECORD",
        }
    }
}

impl fmt::Display for IndexErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised while building a `StudentIndex`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// A student id appeared twice in the input
    #[error("[FATAL] ROSTER_DUPLICATE_ID: student id {student_id} at record {position} already indexed")]
    DuplicateId {
        /// The repeated id
        student_id: StudentId,
        /// Zero-based position of the second occurrence
        position: usize,
    },

    /// A raw record could not be turned into a student record
    #[error("[FATAL] ROSTER_MALFORMED_RECORD: record {position}: {reason}")]
    MalformedRecord {
        /// Zero-based position in the input
        position: usize,
        /// What was wrong with it
        reason: String,
    },
}

impl IndexError {
    /// Create a duplicate id error
    pub fn duplicate_id(student_id: StudentId, position: usize) -> Self {
        IndexError::DuplicateId {
            student_id,
            position,
        }
    }

    /// Create a malformed record error
    pub fn malformed(position: usize, reason: impl Into<String>) -> Self {
        IndexError::MalformedRecord {
            position,
            reason: reason.into(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> IndexErrorCode {
        match self {
            IndexError::DuplicateId { .. } => IndexErrorCode::RosterDuplicateId,
            IndexError::MalformedRecord { .. } => IndexErrorCode::RosterMalformedRecord,
        }
    }

    /// Position of the offending record in the input
    pub fn position(&self) -> usize {
        match self {
            IndexError::DuplicateId { position, .. } => *position,
            IndexError::MalformedRecord { position, .. } => *position,
        }
    }

    /// The offending student id, when known
    pub fn student_id(&self) -> Option<StudentId> {
        match self {
            IndexError::DuplicateId { student_id, .. } => Some(*student_id),
            IndexError::MalformedRecord { .. } => None,
        }
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        true // All index errors abort construction
    }
}

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;
