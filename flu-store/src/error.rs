//! Snapshot load and query errors.

use flu_hub::RowError;

/// Errors raised while building a snapshot. All of them are fatal: a
/// partially loaded snapshot is never handed out.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The CSV layer could not read a record or map it onto the row struct.
    #[error("{source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    /// A record was read but one of its fields is malformed.
    #[error("{source_name} line {line}: {source}")]
    Row {
        source_name: String,
        line: u64,
        #[source]
        source: RowError,
    },

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),
}

/// Errors raised by snapshot queries.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The location name is not in the location table.
    #[error("unknown location '{0}'")]
    UnknownLocation(String),

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),
}
