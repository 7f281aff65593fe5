//! ObservationScope for start/complete logging around a unit of work
//!
//! - `{name}_BEGIN` (INFO) on creation
//! - `{name}_COMPLETE` (INFO) on `complete*`
//! - `{name}_FAILED` (ERROR) on `fail*`
//! - `{name}_INCOMPLETE` (WARN) if dropped without either

use std::io::Write;
use std::time::Instant;

use super::logger::{Logger, Severity};

/// A scope that logs the lifecycle of one operation.
///
/// ```ignore
/// let scope = ObservationScope::with_fields("STUDENT_INDEX_BUILD", &[("hint", "100000")]);
/// // ... build ...
/// scope.complete_with_fields(&[("records", "100000")]);
/// ```
pub struct ObservationScope<'a> {
    name: &'a str,
    completed: bool,
    fields: Vec<(&'a str, String)>,
    started: Instant,
    /// Events go here instead of stdout/stderr when set
    writer: Option<&'a mut dyn Write>,
}

impl<'a> ObservationScope<'a> {
    /// Create a new observation scope
    pub fn new(name: &'a str) -> Self {
        Self::with_fields(name, &[])
    }

    /// Create a new observation scope carrying fields into every event it logs
    pub fn with_fields(name: &'a str, fields: &[(&'a str, &str)]) -> Self {
        Self::with_writer(name, fields, None)
    }

    /// Like `with_fields`, but every event is written to `writer` when given.
    pub(crate) fn with_writer(
        name: &'a str,
        fields: &[(&'a str, &str)],
        writer: Option<&'a mut dyn Write>,
    ) -> Self {
        let mut scope = Self {
            name,
            completed: false,
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            started: Instant::now(),
            writer,
        };
        scope.emit(Severity::Info, "BEGIN", &[]);
        scope
    }

    /// Mark the scope as successfully completed
    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    /// Mark the scope as completed, appending `extra_fields` and `elapsed_ms`
    pub fn complete_with_fields(mut self, extra_fields: &[(&str, &str)]) {
        self.completed = true;
        let elapsed = self.started.elapsed().as_millis().to_string();

        let mut extra: Vec<(&str, &str)> = extra_fields.to_vec();
        extra.push(("elapsed_ms", elapsed.as_str()));

        self.emit(Severity::Info, "COMPLETE", &extra);
    }

    /// Mark the scope as failed with a reason
    pub fn fail(self, reason: &str) {
        self.fail_with_fields(reason, &[]);
    }

    /// Mark the scope as failed with a reason and additional fields
    pub fn fail_with_fields(mut self, reason: &str, extra_fields: &[(&str, &str)]) {
        self.completed = true;

        let mut extra: Vec<(&str, &str)> = extra_fields.to_vec();
        extra.push(("reason", reason));

        self.emit(Severity::Error, "FAILED", &extra);
    }

    /// Check if the scope has been completed
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    fn emit(&mut self, severity: Severity, suffix: &str, extra_fields: &[(&str, &str)]) {
        let event = format!("{}_{}", self.name, suffix);

        let mut all_fields: Vec<(&str, &str)> =
            self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        all_fields.extend(extra_fields.iter().copied());

        match self.writer.as_mut() {
            Some(writer) => Logger::log_to_writer(severity, &event, &all_fields, &mut **writer),
            None => Logger::log(severity, &event, &all_fields),
        }
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.completed {
            self.emit(
                Severity::Warn,
                "INCOMPLETE",
                &[("reason", "scope dropped without completion")],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(buffer: &[u8]) -> Vec<serde_json::Value> {
        String::from_utf8_lossy(buffer)
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_scope_starts_incomplete() {
        let scope = ObservationScope::new("TEST");
        assert!(!scope.is_completed());
        scope.complete();
    }

    #[test]
    fn test_complete_carries_scope_and_extra_fields() {
        let mut buffer = Vec::new();
        let sink: &mut dyn Write = &mut buffer;
        let scope = ObservationScope::with_writer("TEST", &[("hint", "5")], Some(sink));
        scope.complete_with_fields(&[("records", "5")]);

        let logged = events(&buffer);
        assert_eq!(logged.len(), 2);
        assert_eq!(logged[0]["event"], "TEST_BEGIN");
        assert_eq!(logged[0]["hint"], "5");
        assert_eq!(logged[1]["event"], "TEST_COMPLETE");
        assert_eq!(logged[1]["severity"], "INFO");
        assert_eq!(logged[1]["hint"], "5");
        assert_eq!(logged[1]["records"], "5");
        assert!(logged[1].get("elapsed_ms").is_some());
    }

    #[test]
    fn test_fail_logs_error_with_reason() {
        let mut buffer = Vec::new();
        let sink: &mut dyn Write = &mut buffer;
        let scope = ObservationScope::with_writer("TEST", &[], Some(sink));
        scope.fail_with_fields("duplicate student id", &[("position", "3")]);

        let logged = events(&buffer);
        assert_eq!(logged.len(), 2);
        assert_eq!(logged[1]["event"], "TEST_FAILED");
        assert_eq!(logged[1]["severity"], "ERROR");
        assert_eq!(logged[1]["reason"], "duplicate student id");
        assert_eq!(logged[1]["position"], "3");
    }

    #[test]
    fn test_drop_without_complete_warns() {
        let mut buffer = Vec::new();
        let sink: &mut dyn Write = &mut buffer;
        let scope = ObservationScope::with_writer("TEST", &[], Some(sink));
        drop(scope);

        let logged = events(&buffer);
        assert_eq!(logged.len(), 2);
        assert_eq!(logged[1]["event"], "TEST_INCOMPLETE");
        assert_eq!(logged[1]["severity"], "WARN");
    }
}
