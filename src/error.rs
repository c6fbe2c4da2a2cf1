use std::fmt;

use thiserror::Error;

use crate::domain::stream::priority::Priority;
use crate::domain::utils::id::{DeviceId, StreamId};

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to read CSV input: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Failed to parse configuration JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Failed to build internal domain model: {0}")]
    ModelConstructionError(String),

    #[error("Malformed record{}: {reason}", line_suffix(.line))]
    MalformedRecord { line: Option<u64>, reason: String },

    #[error("No path from {from} to {to}")]
    NoPath { from: DeviceId, to: DeviceId },

    #[error("Stream {stream} rejected on link {from} -> {to} at priority {priority}: conflicts with {conflicting}")]
    QueueAdmission { stream: StreamId, conflicting: StreamId, from: DeviceId, to: DeviceId, priority: Priority },

    #[error("Link {from} -> {to} oversubscribed for stream {stream}: higher priority rate {reserved_rate} bit/s >= capacity {capacity} bit/s")]
    CapacityExceeded { stream: StreamId, from: DeviceId, to: DeviceId, capacity: f64, reserved_rate: f64 },
}

fn line_suffix(line: &Option<u64>) -> String {
    line.map(|l| format!(" at line {}", l)).unwrap_or_default()
}

impl Error {
    pub fn malformed(line: Option<u64>, reason: impl Into<String>) -> Self {
        Error::MalformedRecord { line, reason: reason.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::IoError(_) => ErrorKind::Io,
            Error::CsvError(_) => ErrorKind::Csv,
            Error::DeserializationError(_) => ErrorKind::Deserialization,
            Error::ConfigError(_) => ErrorKind::Config,
            Error::ModelConstructionError(_) => ErrorKind::ModelConstruction,
            Error::MalformedRecord { .. } => ErrorKind::MalformedRecord,
            Error::NoPath { .. } => ErrorKind::NoPath,
            Error::QueueAdmission { .. } => ErrorKind::QueueAdmission,
            Error::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
        }
    }
}

/// Fieldless classification of an [`Error`], used to attribute omitted streams and skipped records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    Io,
    Csv,
    Deserialization,
    Config,
    ModelConstruction,
    MalformedRecord,
    NoPath,
    QueueAdmission,
    CapacityExceeded,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Io => "IoError",
            ErrorKind::Csv => "CsvError",
            ErrorKind::Deserialization => "DeserializationError",
            ErrorKind::Config => "ConfigError",
            ErrorKind::ModelConstruction => "ModelConstructionError",
            ErrorKind::MalformedRecord => "MalformedRecordError",
            ErrorKind::NoPath => "NoPathError",
            ErrorKind::QueueAdmission => "QueueAdmissionError",
            ErrorKind::CapacityExceeded => "CapacityExceededError",
        };
        write!(f, "{}", name)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
