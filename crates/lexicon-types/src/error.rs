//! Unified error types for the lexicon domain layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of domain errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or missing input. Never retried.
    Validation,
    /// Missing table, row, column or project.
    NotFound,
    /// Duplicate table name or duplicate code.
    Conflict,
    /// The underlying store rejected a statement.
    Storage,
}

/// Domain-level error with structured context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconError {
    /// The kind of error.
    pub kind: ErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional context.
    pub context: Option<String>,
}

impl LexiconError {
    /// Creates a new `LexiconError`.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: None,
        }
    }

    /// Adds context to the error.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Process exit status for this error's kind.
    pub fn exit_code(&self) -> i32 {
        match self.kind {
            ErrorKind::Validation => 2,
            ErrorKind::NotFound => 3,
            ErrorKind::Conflict => 4,
            ErrorKind::Storage => 5,
        }
    }
}

impl fmt::Display for LexiconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, " ({})", ctx)?;
        }
        Ok(())
    }
}

impl std::error::Error for LexiconError {}

/// Transforms technical errors into user-actionable diagnostics.
///
/// Implementors provide optional `hint` (cause explanation) and `fix`
/// (concrete remediation step) for each error variant.
pub trait DiagnosticError {
    /// A human-readable explanation of the likely cause.
    fn hint(&self) -> Option<String> {
        None
    }
    /// A concrete fix the user can apply.
    fn fix(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_without_context() {
        let err = LexiconError::new(ErrorKind::NotFound, "entry not found");
        assert_eq!(err.to_string(), "[NotFound] entry not found");
    }

    #[test]
    fn error_display_with_context() {
        let err = LexiconError::new(ErrorKind::NotFound, "entry not found").with_context("table: ship_types");
        assert!(err.to_string().contains("ship_types"));
    }

    #[test]
    fn error_serialization_roundtrip() {
        let err = LexiconError::new(ErrorKind::Conflict, "duplicate code: ABC");
        let json = serde_json::to_string(&err).expect("serialize");
        assert!(json.contains("\"conflict\""));
        let back: LexiconError = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.kind, ErrorKind::Conflict);
        assert_eq!(back.message, "duplicate code: ABC");
    }

    #[test]
    fn validation_constructor() {
        let err = LexiconError::validation("bad data");
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn exit_codes_differ_per_kind() {
        let codes: Vec<i32> = [
            ErrorKind::Validation,
            ErrorKind::NotFound,
            ErrorKind::Conflict,
            ErrorKind::Storage,
        ]
        .into_iter()
        .map(|kind| LexiconError::new(kind, "x").exit_code())
        .collect();
        assert_eq!(codes, vec![2, 3, 4, 5]);
    }

    #[test]
    fn diagnostic_trait_defaults_to_none() {
        struct Dummy;
        impl DiagnosticError for Dummy {}
        let d = Dummy;
        assert!(d.hint().is_none());
        assert!(d.fix().is_none());
    }
}
