//! Record fixtures
//!
//! - `sample_records()` - five records small enough to check by hand
//! - `generate_records(count, seed)` - deterministic random records for load testing
//!
//! Generated names are hex digests of a random integer drawn from a range
//! half again as large as the record count, so some names repeat.

use std::fmt::Write;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::index::RawRecord;

/// Programs offered to generated students.
pub const PROGRAMS: [&str; 7] = [
    "Cognitive Science",
    "Computer Science",
    "Psychology",
    "Mathematics",
    "Physics",
    "Engineering",
    "History",
];

/// Genders assigned to generated students.
pub const GENDERS: [&str; 2] = ["M", "F"];

/// Seed used for the reference load-test data set.
pub const DEFAULT_SEED: u64 = 303;

/// Size of the reference load-test data set.
pub const DEFAULT_RECORD_COUNT: usize = 100_000;

/// Highest generated class id.
pub const MAX_CLASS_ID: u32 = 1000;

/// The hand-checkable sample set.
pub fn sample_records() -> Vec<RawRecord> {
    vec![
        sample("Jane Doe", Some("F"), 1, &[("Cognitive Science", 2)], 1996, &[1, 2]),
        sample("John Smith", Some("M"), 2, &[("Mathematics", 4)], 1995, &[1, 77, 18]),
        sample(
            "Han Solo",
            Some("M"),
            99,
            &[("Aerospace Engineering", 2)],
            1977,
            &[18, 20, 21, 33],
        ),
        sample(
            "Jane Doe",
            Some("F"),
            11,
            &[("Computer Science", 3), ("Physics", 2)],
            1995,
            &[1, 77, 18, 20, 21],
        ),
        sample("Uesugi Kenshin", None, 10101, &[("History", 1)], 1530, &[303, 304, 308]),
    ]
}

/// The hand-checkable sample set as mapping-like JSON values.
pub fn sample_records_json() -> Vec<Value> {
    sample_records().iter().map(|record| json!(record)).collect()
}

fn sample(
    name: &str,
    gender: Option<&str>,
    student_id: u64,
    program: &[(&str, u32)],
    date_of_birth: i32,
    classes: &[u32],
) -> RawRecord {
    RawRecord {
        student_id,
        name: name.to_string(),
        gender: gender.map(String::from),
        date_of_birth: Some(date_of_birth),
        program: program.iter().map(|(p, y)| (p.to_string(), *y)).collect(),
        classes: classes.to_vec(),
    }
}

/// Generate `count` random records with ids `1..=count`.
///
/// The same `(count, seed)` always produces the same records.
pub fn generate_records(count: usize, seed: u64) -> Vec<RawRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let name_space = (count as u64).saturating_mul(3) / 2;

    (0..count)
        .map(|idx| sample_record(&mut rng, idx as u64 + 1, name_space))
        .collect()
}

fn sample_record(rng: &mut StdRng, student_id: u64, name_space: u64) -> RawRecord {
    let name = hash_name(rng.gen_range(0..=name_space));
    let gender = GENDERS.choose(rng).map(|g| g.to_string());

    let program_count = rng.gen_range(1..=2);
    let picked: Vec<&str> = PROGRAMS.choose_multiple(rng, program_count).copied().collect();
    let program = picked
        .into_iter()
        .map(|p| (p.to_string(), rng.gen_range(1..=5)))
        .collect();

    let date_of_birth = Some(rng.gen_range(1990..=2002));

    let class_count = rng.gen_range(1..=10);
    let classes = (0..class_count)
        .map(|_| rng.gen_range(1..=MAX_CLASS_ID))
        .collect();

    RawRecord {
        student_id,
        name,
        gender,
        date_of_birth,
        program,
        classes,
    }
}

/// First 32 hex digits of the SHA-256 digest of `value`'s decimal form.
fn hash_name(value: u64) -> String {
    let digest = Sha256::digest(value.to_string().as_bytes());
    digest.iter().take(16).fold(String::with_capacity(32), |mut out, byte| {
        let _ = write!(out, "{:02x}", byte);
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_set_shape() {
        let records = sample_records();
        assert_eq!(records.len(), 5);
        assert_eq!(records[4].gender, None);
        assert_eq!(records[3].program.len(), 2);
    }

    #[test]
    fn test_sample_json_uses_wire_keys() {
        let values = sample_records_json();
        assert_eq!(values[0]["program"], json!([["Cognitive Science", 2]]));
        assert_eq!(values[2]["student_id"], 99);
        assert!(values[4].get("gender").is_none());
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(generate_records(50, 7), generate_records(50, 7));
        assert_ne!(generate_records(50, 7), generate_records(50, 8));
    }

    #[test]
    fn test_generated_ranges() {
        let records = generate_records(2_000, DEFAULT_SEED);

        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.student_id, i as u64 + 1);
            assert_eq!(record.name.len(), 32);
            assert!(GENDERS.contains(&record.gender.as_deref().unwrap()));
            assert!((1990..=2002).contains(&record.date_of_birth.unwrap()));

            assert!((1..=2).contains(&record.program.len()));
            let distinct: HashSet<&str> = record.program.iter().map(|(p, _)| p.as_str()).collect();
            assert_eq!(distinct.len(), record.program.len());
            for (program, year) in &record.program {
                assert!(PROGRAMS.contains(&program.as_str()));
                assert!((1..=5).contains(year));
            }

            assert!((1..=10).contains(&record.classes.len()));
            assert!(record.classes.iter().all(|c| (1..=MAX_CLASS_ID).contains(c)));
        }
    }

    #[test]
    fn test_generated_names_repeat() {
        let records = generate_records(5_000, DEFAULT_SEED);
        let distinct: HashSet<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert!(distinct.len() < records.len());
    }

    #[test]
    fn test_hash_name_is_stable() {
        assert_eq!(hash_name(42), hash_name(42));
        assert_ne!(hash_name(42), hash_name(43));
    }
}
