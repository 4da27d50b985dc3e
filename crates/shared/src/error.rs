//! Error taxonomy for the load pipeline.
//!
//! Each pipeline layer has its own error enum; `PipelineError` joins them so
//! stages compose with `?`, and `ErrorKind` is the flat tag shown to users.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures while acquiring the file's bytes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("file could not be read: {0}")]
    Unreadable(String),
    #[error("file read was aborted")]
    Aborted,
    #[error("file truncated: expected {expected} bytes, read {actual}")]
    Truncated { expected: u64, actual: u64 },
}

/// Failures while decoding STL bytes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("binary STL declares {declared} triangles but only {available} are present")]
    TruncatedBinary { declared: u32, available: usize },
    #[error("malformed ASCII STL at line {line}: {reason}")]
    MalformedAscii { line: usize, reason: String },
    #[error("STL file contains no triangles")]
    EmptyMesh,
    #[error("not a binary or ASCII STL stream")]
    UnsupportedFormat,
}

/// Failures while analysing a decoded mesh
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("mesh has no vertices")]
    EmptyMesh,
}

/// Any failure of the ingest → parse → analyze pipeline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl PipelineError {
    /// Flat error tag for presentation
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Read(ReadError::Unreadable(_)) => ErrorKind::Unreadable,
            PipelineError::Read(ReadError::Aborted) => ErrorKind::Aborted,
            PipelineError::Read(ReadError::Truncated { .. }) => ErrorKind::Truncated,
            PipelineError::Parse(ParseError::TruncatedBinary { .. }) => ErrorKind::TruncatedBinary,
            PipelineError::Parse(ParseError::MalformedAscii { .. }) => ErrorKind::MalformedAscii,
            PipelineError::Parse(ParseError::EmptyMesh) => ErrorKind::EmptyMesh,
            PipelineError::Parse(ParseError::UnsupportedFormat) => ErrorKind::UnsupportedFormat,
            PipelineError::Analysis(AnalysisError::EmptyMesh) => ErrorKind::EmptyMesh,
        }
    }

    /// Free-text detail, when the error carries more than its kind
    pub fn detail(&self) -> Option<String> {
        match self {
            PipelineError::Read(ReadError::Unreadable(_))
            | PipelineError::Read(ReadError::Truncated { .. })
            | PipelineError::Parse(ParseError::TruncatedBinary { .. })
            | PipelineError::Parse(ParseError::MalformedAscii { .. }) => Some(self.to_string()),
            _ => None,
        }
    }

    pub fn to_failure(&self) -> Failure {
        Failure {
            kind: self.kind(),
            detail: self.detail(),
        }
    }
}

/// Flat error tag carried by the `Failed` state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unreadable,
    Aborted,
    Truncated,
    TruncatedBinary,
    MalformedAscii,
    EmptyMesh,
    UnsupportedFormat,
}

impl ErrorKind {
    /// Stable identifier, used as an i18n key suffix
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unreadable => "unreadable",
            ErrorKind::Aborted => "aborted",
            ErrorKind::Truncated => "truncated",
            ErrorKind::TruncatedBinary => "truncated_binary",
            ErrorKind::MalformedAscii => "malformed_ascii",
            ErrorKind::EmptyMesh => "empty_mesh",
            ErrorKind::UnsupportedFormat => "unsupported_format",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error kind plus optional detail, as published in the `Failed` state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: ErrorKind,
    pub detail: Option<String>,
}

impl From<&PipelineError> for Failure {
    fn from(err: &PipelineError) -> Self {
        err.to_failure()
    }
}

/// Reasons a selection is rejected before any loading starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("'{name}' is not an .stl file")]
    NotStl { name: String },
    #[error("'{name}' is {size} bytes, above the {limit} byte limit")]
    TooLarge { name: String, size: u64, limit: u64 },
}
