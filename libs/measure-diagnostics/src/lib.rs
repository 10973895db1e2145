//! Diagnostics for the Mensura resolvers
//!
//! Validation failures are data, never control flow: every resolver returns a
//! [`Validated`] value carrying its (possibly empty) result next to the
//! diagnostics it produced, and aggregation points concatenate those lists
//! explicitly. There is no global diagnostic sink.

pub mod code;
pub mod validated;

pub use code::DiagnosticCode;
pub use validated::Validated;

use mensura_models::SourceRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One validation finding, attributed to a declaration site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    pub location: SourceRef,
}

impl Diagnostic {
    /// Create a diagnostic at the code's default severity.
    pub fn new(code: DiagnosticCode, message: impl Into<String>, location: SourceRef) -> Self {
        Self {
            code,
            severity: code.default_severity(),
            message: message.into(),
            location,
        }
    }

    pub fn error(code: DiagnosticCode, message: impl Into<String>, location: SourceRef) -> Self {
        Self {
            code,
            severity: Severity::Error,
            message: message.into(),
            location,
        }
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>, location: SourceRef) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            message: message.into(),
            location,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} [{}] at {}",
            self.severity, self.message, self.code, self.location
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}
