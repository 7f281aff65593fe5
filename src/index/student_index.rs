//! StudentIndex: an immutable, multi-key index over student records
//!
//! # API
//!
//! - `build(records)` / `build_from_json(values)` - One-pass construction
//! - `find_by_name(name)` - All students sharing a name, in input order
//! - `find_by_idx(id)` - The student with a given id
//! - `list_students_by_program_and_year(program, year)` - Ascending by id
//! - `list_students_enrolled_in_class(class_id)` - Ascending by id
//!
//! # Invariants
//!
//! - Each student id is stored exactly once in `by_id`
//! - Secondary indexes hold ids only and are filled in the same pass as `by_id`
//! - No method mutates the index after `build` returns

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::io::Write;

use serde::Serialize;
use serde_json::Value;

use crate::config::IndexConfig;
use crate::observability::ObservationScope;

use super::errors::{IndexError, IndexResult};
use super::record::{ClassId, RawRecord, StudentId, StudentRecord};

const BUILD_SCOPE: &str = "STUDENT_INDEX_BUILD";

/// Upper bound on `expected_records` pre-sizing; larger hints grow on demand.
const MAX_PRESIZE: usize = 1 << 17;

/// Sizes of the index's key spaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Indexed students
    pub records: usize,
    /// Distinct names
    pub distinct_names: usize,
    /// Distinct (program, year) pairs
    pub program_year_buckets: usize,
    /// Distinct class ids
    pub class_buckets: usize,
}

/// Index over student records, built once and then only queried.
#[derive(Debug, Default)]
pub struct StudentIndex {
    /// Primary storage (student_id -> record)
    by_id: HashMap<StudentId, StudentRecord>,

    /// name -> ids in input order
    by_name: HashMap<String, Vec<StudentId>>,

    /// program -> year -> ids
    by_program_year: HashMap<String, HashMap<u32, BTreeSet<StudentId>>>,

    /// class_id -> ids
    by_class: HashMap<ClassId, BTreeSet<StudentId>>,
}

impl StudentIndex {
    /// Build an index with the default configuration.
    ///
    /// Fails with `ROSTER_DUPLICATE_ID` if two records share a student id.
    pub fn build<I>(records: I) -> IndexResult<Self>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        Self::build_with_config(records, &IndexConfig::default())
    }

    /// Build an index from typed records.
    pub fn build_with_config<I>(records: I, config: &IndexConfig) -> IndexResult<Self>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        Self::build_checked(records.into_iter().map(Ok), config, None)
    }

    /// Build an index from mapping-like JSON records with the default configuration.
    ///
    /// A record missing `student_id`, `name`, `program` or `classes`, or with a
    /// wrongly typed field, fails with `ROSTER_MALFORMED_RECORD`.
    pub fn build_from_json<I>(values: I) -> IndexResult<Self>
    where
        I: IntoIterator<Item = Value>,
    {
        Self::build_from_json_with_config(values, &IndexConfig::default())
    }

    /// Build an index from mapping-like JSON records.
    pub fn build_from_json_with_config<I>(values: I, config: &IndexConfig) -> IndexResult<Self>
    where
        I: IntoIterator<Item = Value>,
    {
        let parsed = values.into_iter().enumerate().map(|(position, value)| {
            serde_json::from_value::<RawRecord>(value)
                .map_err(|e| IndexError::malformed(position, e.to_string()))
        });

        Self::build_checked(parsed, config, None)
    }

    /// Single pass over the input. The partially built index is dropped on
    /// the first error, so callers never observe it.
    ///
    /// Build events go to `log_writer` when given, otherwise to stdout/stderr.
    fn build_checked<I>(
        records: I,
        config: &IndexConfig,
        log_writer: Option<&mut dyn Write>,
    ) -> IndexResult<Self>
    where
        I: Iterator<Item = IndexResult<RawRecord>>,
    {
        let hint = config.expected_records.unwrap_or(0);
        let scope = config.log_events.then(|| {
            ObservationScope::with_writer(
                BUILD_SCOPE,
                &[("expected_records", hint.to_string().as_str())],
                log_writer,
            )
        });

        let mut index = Self {
            by_id: HashMap::with_capacity(hint.min(MAX_PRESIZE)),
            ..Default::default()
        };

        for (position, raw) in records.enumerate() {
            if let Err(err) = raw.and_then(|raw| index.index_record(position, raw)) {
                if let Some(scope) = scope {
                    let position = err.position().to_string();
                    let student_id = err.student_id().map(|id| id.to_string());
                    let mut fields = vec![("position", position.as_str())];
                    if let Some(id) = &student_id {
                        fields.push(("student_id", id.as_str()));
                    }
                    scope.fail_with_fields(&err.to_string(), &fields);
                }
                return Err(err);
            }
        }

        if let Some(scope) = scope {
            let stats = index.stats();
            let record_count = stats.records.to_string();
            let names = stats.distinct_names.to_string();
            let program_years = stats.program_year_buckets.to_string();
            let classes = stats.class_buckets.to_string();
            scope.complete_with_fields(&[
                ("records", record_count.as_str()),
                ("distinct_names", names.as_str()),
                ("program_year_buckets", program_years.as_str()),
                ("class_buckets", classes.as_str()),
            ]);
        }

        Ok(index)
    }

    fn index_record(&mut self, position: usize, raw: RawRecord) -> IndexResult<()> {
        let slot = match self.by_id.entry(raw.student_id) {
            Entry::Occupied(_) => return Err(IndexError::duplicate_id(raw.student_id, position)),
            Entry::Vacant(slot) => slot,
        };

        let record = StudentRecord::from(raw);
        let id = record.student_id;

        // Only clone the name for its first occurrence
        match self.by_name.get_mut(&record.name) {
            Some(ids) => ids.push(id),
            None => {
                self.by_name.insert(record.name.clone(), vec![id]);
            }
        }

        for enrollment in &record.programs {
            self.by_program_year
                .entry(enrollment.program.clone())
                .or_default()
                .entry(enrollment.year)
                .or_default()
                .insert(id);
        }

        for &class_id in &record.classes {
            self.by_class.entry(class_id).or_default().insert(id);
        }

        slot.insert(record);
        Ok(())
    }

    /// All students named `name`, in input order. Empty if none.
    pub fn find_by_name(&self, name: &str) -> Vec<&StudentRecord> {
        match self.by_name.get(name) {
            Some(ids) => self.resolve(ids.iter()),
            None => Vec::new(),
        }
    }

    /// The student with `student_id`, or `None`.
    pub fn find_by_idx(&self, student_id: StudentId) -> Option<&StudentRecord> {
        self.by_id.get(&student_id)
    }

    /// Students enrolled in `program` at `year`, ascending by id.
    pub fn list_students_by_program_and_year(&self, program: &str, year: u32) -> Vec<&StudentRecord> {
        let Some(ids) = self
            .by_program_year
            .get(program)
            .and_then(|years| years.get(&year))
        else {
            return Vec::new();
        };

        self.resolve(ids.iter())
    }

    /// Students enrolled in `class_id`, ascending by id.
    pub fn list_students_enrolled_in_class(&self, class_id: ClassId) -> Vec<&StudentRecord> {
        match self.by_class.get(&class_id) {
            Some(ids) => self.resolve(ids.iter()),
            None => Vec::new(),
        }
    }

    /// Number of indexed students
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the index holds no students
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Whether `student_id` is indexed
    pub fn contains_id(&self, student_id: StudentId) -> bool {
        self.by_id.contains_key(&student_id)
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            records: self.by_id.len(),
            distinct_names: self.by_name.len(),
            program_year_buckets: self.by_program_year.values().map(HashMap::len).sum(),
            class_buckets: self.by_class.len(),
        }
    }

    // Every id in a secondary index was inserted alongside its record.
    fn resolve<'a>(&self, ids: impl Iterator<Item = &'a StudentId>) -> Vec<&StudentRecord> {
        ids.filter_map(|id| self.by_id.get(id)).collect()
    }
}
