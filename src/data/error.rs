//! Error types for data operations
//!
//! "Data not ready" is not an error: reads that need a reload return
//! [`CellRead::Pending`](crate::data::CellRead). Everything here is fatal for
//! the operation that raised it.

use thiserror::Error;

use crate::data::remote::RemoteError;

/// Errors that can occur while loading or reading a list
#[derive(Error, Debug)]
pub enum DataError {
    /// A read happened before the first completed load
    #[error("List data is not loaded yet")]
    NotLoaded,

    /// The field has no metadata entry
    #[error("The field {0} does not exist or you do not have access to that field")]
    UnknownField(String),

    /// A row position no limit can cover
    #[error("Row position {0} is out of range")]
    PositionOutOfRange(usize),

    /// Field metadata is inconsistent with its type
    #[error("Invalid metadata for field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    /// A raw value cannot be converted for its field type
    #[error("Invalid value for field {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// The remote search/read call failed
    #[error("Remote fetch failed: {0}")]
    Remote(#[from] RemoteError),

    /// A reload completed with a ticket that is not the one in flight
    #[error("Stale reload ticket {got} (expected {expected:?})")]
    StaleTicket { expected: Option<u64>, got: u64 },

    /// JSON error from serde_json
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for data operations
pub type DataResult<T> = Result<T, DataError>;
