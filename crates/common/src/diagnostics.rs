//! Generation-time diagnostics
//!
//! Issues scoped to a single operation. They are collected for the reporting
//! layer and never abort a generation run.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Note,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A required wire parameter has no convenience parameter or default
    UnmappableParameter,
    /// Category flags contradict the available metadata
    MalformedMetadata,
    /// An optional wire parameter was left out of the convenience signature
    DroppedParameter,
    /// No decoding is known for the declared content types
    UnsupportedContentType,
}

/// One diagnostic attached to an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub operation: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        kind: DiagnosticKind,
        operation: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            kind,
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    pub fn error(kind: DiagnosticKind, operation: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, kind, operation, message)
    }

    pub fn warning(kind: DiagnosticKind, operation: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, kind, operation, message)
    }

    pub fn note(kind: DiagnosticKind, operation: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Note, kind, operation, message)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}[{}]: {}", severity, self.operation, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::error(
            DiagnosticKind::UnmappableParameter,
            "get_widget",
            "parameter 'session' has no mapping",
        );
        assert!(d.is_error());
        assert_eq!(
            d.to_string(),
            "error[get_widget]: parameter 'session' has no mapping"
        );
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Note);
    }
}
