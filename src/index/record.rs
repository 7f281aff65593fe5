//! Student record types
//!
//! `RawRecord` is the input shape handed to the index builder;
//! `StudentRecord` is the immutable value the index stores and returns.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Globally unique student identifier
pub type StudentId = u64;

/// Class identifier
pub type ClassId = u32;

/// One record as supplied by the data source.
///
/// Keys: `name`, `gender` (optional), `student_id`, `program` (list of
/// `[program, year]` pairs), `date_of_birth` (optional), `classes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub student_id: StudentId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<i32>,
    pub program: Vec<(String, u32)>,
    pub classes: Vec<ClassId>,
}

/// Enrollment in a program at a given year of study.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgramEnrollment {
    pub program: String,
    pub year: u32,
}

impl ProgramEnrollment {
    pub fn new(program: impl Into<String>, year: u32) -> Self {
        Self {
            program: program.into(),
            year,
        }
    }
}

/// An indexed student.
///
/// Serializes with `programs` as `{program, year}` objects and absent optional
/// fields as `null`; this differs from the `RawRecord` input shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_id: StudentId,
    pub name: String,
    pub gender: Option<String>,
    /// Year of birth
    pub date_of_birth: Option<i32>,
    /// Programs in input order
    pub programs: Vec<ProgramEnrollment>,
    /// Classes; repeated input ids collapse
    pub classes: BTreeSet<ClassId>,
}

impl StudentRecord {
    /// Whether the student holds `program` at `year`.
    pub fn is_in_program(&self, program: &str, year: u32) -> bool {
        self.programs
            .iter()
            .any(|p| p.program == program && p.year == year)
    }

    /// Whether the student is enrolled in `class_id`.
    pub fn is_enrolled_in(&self, class_id: ClassId) -> bool {
        self.classes.contains(&class_id)
    }
}

impl From<RawRecord> for StudentRecord {
    fn from(raw: RawRecord) -> Self {
        Self {
            student_id: raw.student_id,
            name: raw.name,
            gender: raw.gender,
            date_of_birth: raw.date_of_birth,
            programs: raw
                .program
                .into_iter()
                .map(|(program, year)| ProgramEnrollment { program, year })
                .collect(),
            classes: raw.classes.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_record_from_mapping() {
        let raw: RawRecord = serde_json::from_value(json!({
            "name": "Jane Doe",
            "gender": "F",
            "student_id": 11,
            "program": [["Computer Science", 3], ["Physics", 2]],
            "date_of_birth": 1995,
            "classes": [1, 77, 18, 20, 21]
        }))
        .unwrap();

        assert_eq!(raw.student_id, 11);
        assert_eq!(raw.program[1], ("Physics".to_string(), 2));
    }

    #[test]
    fn test_optional_fields_may_be_absent() {
        let raw: RawRecord = serde_json::from_value(json!({
            "name": "Uesugi Kenshin",
            "student_id": 10101,
            "program": [["History", 1]],
            "classes": [303, 304, 308]
        }))
        .unwrap();

        assert_eq!(raw.gender, None);
        assert_eq!(raw.date_of_birth, None);
    }

    #[test]
    fn test_student_record_output_shape() {
        let raw: RawRecord = serde_json::from_value(json!({
            "name": "Uesugi Kenshin",
            "student_id": 10101,
            "program": [["History", 1]],
            "classes": [308, 303, 304, 303]
        }))
        .unwrap();

        let output = serde_json::to_value(StudentRecord::from(raw)).unwrap();
        assert_eq!(
            output,
            json!({
                "student_id": 10101,
                "name": "Uesugi Kenshin",
                "gender": null,
                "date_of_birth": null,
                "programs": [{"program": "History", "year": 1}],
                "classes": [303, 304, 308]
            })
        );
    }

    #[test]
    fn test_conversion_collapses_repeated_classes() {
        let raw = RawRecord {
            student_id: 7,
            name: "Repeat Taker".to_string(),
            gender: None,
            date_of_birth: Some(2000),
            program: vec![("Physics".to_string(), 1), ("History".to_string(), 3)],
            classes: vec![5, 3, 5, 5],
        };

        let record = StudentRecord::from(raw);
        assert_eq!(record.classes.iter().copied().collect::<Vec<_>>(), vec![3, 5]);
        assert_eq!(
            record.programs,
            vec![
                ProgramEnrollment::new("Physics", 1),
                ProgramEnrollment::new("History", 3)
            ]
        );
        assert!(record.is_in_program("History", 3));
        assert!(!record.is_in_program("History", 1));
        assert!(record.is_enrolled_in(5));
        assert!(!record.is_enrolled_in(4));
    }
}
