//! Spreadsheet list data sources.
//!
//! Presents a remote, server-side filtered and sorted list of records as a
//! lazily-widening grid that spreadsheet cells read by position and field
//! name. See [`data::ListDataSource`] for the loading model and
//! [`data::ListSession`] for reload coalescing.

pub mod constants;
pub mod data;
pub mod logging;
pub mod perf;
pub mod settings;
pub mod types;
