//! Remote search/read collaborator.
//!
//! The data source never talks to a transport directly. It produces a
//! [`FetchRequest`] and something implementing [`SearchRead`] answers it.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::Record;

/// Failure reported by the remote search/read service
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct RemoteError {
    pub message: String,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One search/read call, fully resolved.
///
/// Serializes to the keyword arguments of the remote call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FetchRequest {
    /// Identifies the reload this request belongs to
    #[serde(skip)]
    pub ticket: u64,
    pub model: String,
    pub domain: Value,
    /// Effective projection, each field exactly once
    pub fields: Vec<String>,
    /// Sort string, e.g. `"name ASC, id DESC"`
    pub order: String,
    pub limit: usize,
    pub context: Map<String, Value>,
}

/// A remote tabular source supporting filtering, ordering and truncation.
pub trait SearchRead {
    fn search_read(&self, request: &FetchRequest) -> Result<Vec<Record>, RemoteError>;
}

impl<T: SearchRead + ?Sized> SearchRead for &T {
    fn search_read(&self, request: &FetchRequest) -> Result<Vec<Record>, RemoteError> {
        (**self).search_read(request)
    }
}

impl<T: SearchRead + ?Sized> SearchRead for Box<T> {
    fn search_read(&self, request: &FetchRequest) -> Result<Vec<Record>, RemoteError> {
        (**self).search_read(request)
    }
}
