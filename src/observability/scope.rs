//! ObservationScope - BEGIN/COMPLETE logging around one command
//!
//! - Logs `{name}_BEGIN` on creation
//! - Logs `{name}_COMPLETE` on `complete()`
//! - Logs `{name}_FAILED` on `fail()`, FATAL for environment failures
//! - Logs `{name}_INCOMPLETE` if dropped without either

use std::cell::Cell;

use super::logger::Logger;
use crate::errors::DocError;

pub struct ObservationScope {
    name: String,
    finished: Cell<bool>,
    fields: Vec<(String, String)>,
}

impl ObservationScope {
    pub fn new(name: &str) -> Self {
        Self::with_fields(name, &[])
    }

    pub fn with_fields(name: &str, fields: &[(&str, &str)]) -> Self {
        Logger::info(&format!("{}_BEGIN", name), fields);
        Self {
            name: name.to_string(),
            finished: Cell::new(false),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn field_refs(&self) -> Vec<(&str, &str)> {
        self.fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    pub fn complete_with_fields(self, extra: &[(&str, &str)]) {
        self.finished.set(true);
        let mut fields = self.field_refs();
        fields.extend(extra.iter().copied());
        Logger::info(&format!("{}_COMPLETE", self.name), &fields);
    }

    /// Logs the failure; severity follows the error's classification.
    pub fn fail(self, error: &DocError) {
        self.finished.set(true);
        let event = format!("{}_FAILED", self.name);
        let reason = error.to_string();
        let fields = [("code", error.code()), ("reason", reason.as_str())];
        if error.is_fatal() {
            Logger::fatal(&event, &fields);
        } else {
            Logger::error(&event, &fields);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished.get()
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.finished.get() {
            let event = format!("{}_INCOMPLETE", self.name);
            Logger::warn(&event, &[("reason", "scope dropped without completion")]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_complete() {
        let scope = ObservationScope::with_fields("SAVE", &[("version", "2")]);
        assert!(!scope.is_finished());
        scope.complete_with_fields(&[("history_len", "1")]);
    }

    #[test]
    fn test_scope_fail_recoverable_and_fatal() {
        ObservationScope::new("ADD_REVISION").fail(&DocError::DuplicateRevision(1));
        ObservationScope::new("SAVE").fail(&DocError::MissingString("auto revision"));
    }

    #[test]
    fn test_scope_drop_without_complete() {
        let scope = ObservationScope::new("SAVE");
        drop(scope);
    }
}
