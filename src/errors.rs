//! Unified application error type.
//! All modules (db, core, client, server, cli) return AppError so that the
//! CLI and the HTTP layer can report failures the same way.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Store
    // ---------------------------
    #[error("Store unavailable: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Input
    // ---------------------------
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    // ---------------------------
    // Lookup
    // ---------------------------
    #[error("Entry #{0} not found")]
    NotFound(i64),

    // ---------------------------
    // Config / server
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// True when the same request may succeed if retried later.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Store(_) | AppError::Io(_))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Field-level validation messages, keyed by payload field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        self.fields.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// `Ok(value)` when nothing was recorded, the collected errors otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for msg in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {msg}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_collect_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("person", "is required");
        errors.add("person", "must be at most 100 characters");
        errors.add("finish_time", "must be after start_time");

        assert!(errors.has("person"));
        assert_eq!(errors.messages("person").len(), 2);
        assert_eq!(
            errors.to_string(),
            "finish_time: must be after start_time; person: is required; person: must be at most 100 characters"
        );
        assert!(errors.into_result(()).is_err());
    }

    #[test]
    fn store_errors_are_transient() {
        let err = AppError::from(rusqlite::Error::InvalidQuery);
        assert!(err.is_transient());
        assert!(!AppError::NotFound(3).is_transient());
    }
}
