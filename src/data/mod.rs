//! List data handling module
//!
//! This module turns a remote search/read service into a random-access grid
//! that spreadsheet cells can read from.
//!
//! ## Loading
//!
//! `ListDataSource` holds the fetched window and never does IO itself. Reads
//! that need more rows or an extra column return `CellRead::Pending` with the
//! widen request that satisfies them; `ListSession` applies those requests
//! once per turn and issues a single coalesced reload.
//!
//! ## Error Handling
//!
//! All data operations return `DataResult<T>` which uses the `DataError` type.
//! Common errors include:
//! - `NotLoaded`: Read before the first completed load
//! - `UnknownField`: Field without metadata
//! - `Remote`: The search/read call failed

mod error;
mod format;
mod list_source;
mod metadata;
mod remote;
mod session;

pub use error::*;
pub use format::*;
pub use list_source::*;
pub use metadata::*;
pub use remote::*;
pub use session::*;
