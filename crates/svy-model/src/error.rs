use thiserror::Error;

/// Failure kinds surfaced by the export pipeline.
///
/// Only missing column metadata is recovered locally (the column is dropped
/// with a warning before any response is processed); every variant here
/// aborts the run and is distinct enough for the caller to present an
/// accurate message.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A date-kind cell could not be parsed as a calendar timestamp.
    /// Silently zeroing it would corrupt the column's inferred type, so the
    /// whole run aborts before the document is emitted.
    #[error("row {row}, column {column}: cannot interpret '{value}' as a date/time")]
    InvalidDate {
        row: usize,
        column: String,
        value: String,
    },
    /// A column references a label set the registry never created.
    /// Internal contract violation, not a user-facing condition.
    #[error("column {column} references unregistered label set {name}")]
    MissingLabelSet { column: String, name: String },
    /// Survey metadata is structurally unusable (not the per-column
    /// missing-metadata case, which only drops the column).
    #[error("survey metadata: {0}")]
    Metadata(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;
