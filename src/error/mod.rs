//! Error types for flatrec operations.
//!
//! This module provides:
//! - `Stage`: Indicates which file operation failed
//! - `FlatError`: Every failure a codec, reader or writer can report
//!
//! Numeric conversion never fails; it falls back to the raw string.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Error while opening the file or stream
    Open,
    Read,
    Write,
    /// Error while flushing buffered output
    Flush,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Open => write!(f, "Open"),
            Stage::Read => write!(f, "Read"),
            Stage::Write => write!(f, "Write"),
            Stage::Flush => write!(f, "Flush"),
        }
    }
}

/// Errors that can occur while decoding, reading or writing records.
#[derive(Debug, Error)]
pub enum FlatError {
    /// Unbalanced or misplaced quoting under strict parsing.
    /// `line` is 1-based; 0 means the row was not read from input.
    #[error("malformed row{}: {reason}", location(.line))]
    MalformedRow { line: usize, reason: String },

    /// A row's field count differs from the schema's column count
    #[error("column count mismatch{}: expected {expected}, found {found}", location(.line))]
    ColumnCountMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Underlying open/read/write/flush failure
    #[error("[{stage}] {target}: {source}")]
    FileAccess {
        stage: Stage,
        /// File path, or "-" for a caller-supplied stream
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// Options rejected while loading or validating a configuration
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("unknown column: {0}")]
    UnknownColumn(String),
}

impl FlatError {
    pub(crate) fn file_access(
        stage: Stage,
        target: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        FlatError::FileAccess {
            stage,
            target: target.into(),
            source,
        }
    }

    /// Line number the error refers to, for decode failures.
    pub fn line(&self) -> Option<usize> {
        match self {
            FlatError::MalformedRow { line, .. } | FlatError::ColumnCountMismatch { line, .. } => {
                Some(*line)
            }
            _ => None,
        }
    }

    /// Returns `true` for errors raised by the line codec rather than by I/O.
    pub fn is_decode_error(&self) -> bool {
        self.line().is_some()
    }
}

fn location(line: &usize) -> String {
    if *line == 0 {
        String::new()
    } else {
        format!(" at line {line}")
    }
}

pub type Result<T, E = FlatError> = std::result::Result<T, E>;

#[cfg(feature = "miette")]
mod miette_impl;

#[cfg(feature = "miette")]
pub use miette_impl::*;
