//! Miette integration for pretty error reporting.

use miette::{Diagnostic, Severity};
use thiserror::Error;

use super::FlatError;

/// A diagnostic wrapper for flatrec errors compatible with miette.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct FlatDiagnostic {
    /// The error message
    pub message: String,

    #[source]
    /// The underlying error source
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,

    #[help]
    /// Help text for the user
    pub help: Option<String>,

    #[diagnostic(severity)]
    /// Severity level
    pub severity: Severity,
}

impl From<FlatError> for FlatDiagnostic {
    fn from(e: FlatError) -> Self {
        let help = match &e {
            FlatError::MalformedRow { .. } => {
                Some("Check the row's quoting, or enable liberal_parsing".into())
            }
            FlatError::ColumnCountMismatch { .. } => Some(
                "The row does not match the schema width; enable liberal_parsing to pad or truncate"
                    .into(),
            ),
            FlatError::FileAccess { .. } => Some("Check the path and its permissions".into()),
            FlatError::InvalidOptions(_) => {
                Some("col_sep and row_sep must be non-empty strings".into())
            }
            FlatError::UnknownColumn(_) => None,
        };
        let message = e.to_string();
        let source: Option<Box<dyn std::error::Error + Send + Sync>> = match e {
            FlatError::FileAccess { source, .. } => Some(Box::new(source)),
            _ => None,
        };
        FlatDiagnostic {
            message,
            source,
            help,
            severity: Severity::Error,
        }
    }
}

impl From<FlatError> for miette::Report {
    fn from(e: FlatError) -> Self {
        miette::Report::new(FlatDiagnostic::from(e))
    }
}
