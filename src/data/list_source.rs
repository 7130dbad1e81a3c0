//! Lazily-widening list data source.
//!
//! A [`ListDataSource`] owns a bounded window of records fetched from a remote
//! search/read service and exposes it as a grid addressed by position and
//! field name. Reads never mutate: when a read needs data the window does not
//! hold, it returns [`CellRead::Pending`] carrying the [`Widen`] request that
//! would satisfy it. The owner applies widen requests with
//! [`ListDataSource::widen`] and drives reloads with
//! [`ListDataSource::begin_reload`] / [`ListDataSource::finish_reload`].
//!
//! The source itself does no IO. At most one reload is in flight; a reload
//! requested meanwhile is deferred and reported by `finish_reload` so the
//! owner can re-run it immediately.

use std::collections::HashMap;
use std::sync::Arc;

use crate::data::error::{DataError, DataResult};
use crate::data::format::format_cell;
use crate::data::metadata::MetadataRepository;
use crate::data::remote::{FetchRequest, RemoteError};
use crate::types::{
    order_by_to_string, CellValue, FieldDescriptor, ListDefinition, Record, RecordId,
    SearchParams,
};

/// Lifecycle of a data source
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    /// No load has completed and none is running
    Unloaded,
    /// A reload is in flight
    Loading,
    /// The window matches the requested projection
    Loaded,
    /// The requested projection outgrew the window; a reload is needed
    Stale,
}

/// A request for more state than the window holds
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Widen {
    /// Fetch at least this many rows
    Limit(usize),
    /// Add this field to the projection
    Column(String),
}

/// Outcome of a cell read
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub enum CellRead {
    Ready(CellValue),
    /// Data not loaded yet; retry after the reload that applies the widen request
    Pending(Widen),
}

impl CellRead {
    pub fn is_pending(&self) -> bool {
        matches!(self, CellRead::Pending(_))
    }

    pub fn ready(self) -> Option<CellValue> {
        match self {
            CellRead::Ready(value) => Some(value),
            CellRead::Pending(_) => None,
        }
    }
}

/// Result of asking for a reload
#[derive(Clone, Debug, PartialEq)]
pub enum Reload {
    /// Send this request, then hand the answer to `finish_reload`
    Fetch(FetchRequest),
    /// Completed without a remote call (limit is zero)
    Complete,
    /// A reload is already in flight; it will report that a rerun is needed
    Deferred,
}

/// Records produced by one completed load, replaced as a unit
#[derive(Debug)]
struct Window {
    records: Vec<Record>,
    /// Projection that produced the records
    fields: Vec<String>,
    /// Limit the records were fetched with
    limit: usize,
}

/// The reload currently awaiting its answer
#[derive(Debug)]
struct InFlight {
    ticket: u64,
    fields: Vec<String>,
    limit: usize,
}

/// Remote list presented as a position × field grid.
pub struct ListDataSource {
    model: String,
    /// Requested columns, de-duplicated, in request order
    columns: Vec<String>,
    fields: HashMap<String, FieldDescriptor>,
    search: SearchParams,
    /// Requested row count; only grows
    limit: usize,
    names: Arc<dyn MetadataRepository>,
    window: Option<Window>,
    in_flight: Option<InFlight>,
    next_ticket: u64,
    /// A reload was requested while another was in flight
    rerun: bool,
}

impl ListDataSource {
    pub fn new(definition: ListDefinition, names: Arc<dyn MetadataRepository>) -> Self {
        let mut columns: Vec<String> = Vec::with_capacity(definition.columns.len());
        for column in definition.columns {
            push_unique(&mut columns, column);
        }

        Self {
            model: definition.model,
            columns,
            fields: definition.fields,
            search: definition.search,
            limit: definition.limit,
            names,
            window: None,
            in_flight: None,
            next_ticket: 0,
            rerun: false,
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Requested columns
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Requested row count
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn search(&self) -> &SearchParams {
        &self.search
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    /// Number of records in the window (0 before the first load)
    pub fn record_count(&self) -> usize {
        self.window.as_ref().map_or(0, |w| w.records.len())
    }

    /// Whether at least one load has completed
    pub fn is_loaded(&self) -> bool {
        self.window.is_some()
    }

    pub fn state(&self) -> LoadState {
        if self.in_flight.is_some() {
            LoadState::Loading
        } else if self.window.is_none() {
            LoadState::Unloaded
        } else if self.needs_reload() {
            LoadState::Stale
        } else {
            LoadState::Loaded
        }
    }

    /// Whether the requested projection differs from the loaded one
    pub fn needs_reload(&self) -> bool {
        let Some(window) = &self.window else {
            return true;
        };
        self.rerun
            || window.limit != self.limit
            || self
                .fields_to_fetch()
                .iter()
                .any(|f| !window.fields.contains(f))
    }

    /// Effective projection: requested columns that have metadata, followed by
    /// the currency field of every monetary column, each exactly once.
    pub fn fields_to_fetch(&self) -> Vec<String> {
        let mut fields: Vec<String> = self
            .columns
            .iter()
            .filter(|c| self.fields.contains_key(c.as_str()))
            .cloned()
            .collect();

        let currencies: Vec<String> = fields
            .iter()
            .filter_map(|f| self.fields.get(f))
            .filter_map(|d| d.currency_field())
            .map(str::to_string)
            .collect();

        for currency in currencies {
            push_unique(&mut fields, currency);
        }
        fields
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// Identifier of the record at `position`, if one occupies it
    pub fn get_id_from_position(&self, position: usize) -> DataResult<Option<RecordId>> {
        let window = self.loaded_window()?;
        Ok(window.records.get(position).and_then(Record::id))
    }

    /// Header label of `field`, or the field name without metadata
    pub fn get_list_header_value(&self, field: &str) -> DataResult<String> {
        self.loaded_window()?;
        Ok(self
            .fields
            .get(field)
            .map_or_else(|| field.to_string(), |d| d.label.clone()))
    }

    /// Formatted value of `field` for the record at `position`
    pub fn get_list_cell_value(&self, position: usize, field: &str) -> DataResult<CellRead> {
        let window = self.loaded_window()?;

        if position >= window.limit {
            let limit = position
                .checked_add(1)
                .ok_or(DataError::PositionOutOfRange(position))?;
            tracing::trace!(position, limit = window.limit, "Cell outside of loaded rows");
            return Ok(CellRead::Pending(Widen::Limit(limit)));
        }

        let descriptor = self
            .fields
            .get(field)
            .ok_or_else(|| DataError::UnknownField(field.to_string()))?;

        let Some(record) = window.records.get(position) else {
            return Ok(CellRead::Ready(CellValue::empty()));
        };

        // Projected fields the remote left out read as "no value"
        let absent = serde_json::Value::Null;
        let raw = match record.get(field) {
            Some(raw) => raw,
            None if window.fields.iter().any(|f| f == field) => &absent,
            None => {
                tracing::trace!(field, "Cell field not fetched yet");
                return Ok(CellRead::Pending(Widen::Column(field.to_string())));
            }
        };

        format_cell(descriptor, raw, self.names.as_ref()).map(CellRead::Ready)
    }

    fn loaded_window(&self) -> DataResult<&Window> {
        self.window.as_ref().ok_or(DataError::NotLoaded)
    }

    // ------------------------------------------------------------------------
    // Widening and reloads
    // ------------------------------------------------------------------------

    /// Apply a widen request to the requested projection.
    ///
    /// Returns whether the projection changed. The window is untouched until
    /// the next reload completes.
    pub fn widen(&mut self, widen: Widen) -> bool {
        match widen {
            Widen::Limit(limit) if limit > self.limit => {
                tracing::debug!(from = self.limit, to = limit, model = %self.model, "Widening limit");
                self.limit = limit;
                true
            }
            Widen::Limit(_) => false,
            Widen::Column(field) => {
                let added = push_unique(&mut self.columns, field);
                if added {
                    tracing::debug!(columns = self.columns.len(), model = %self.model, "Added column");
                }
                added
            }
        }
    }

    /// Start a reload of the requested projection.
    pub fn begin_reload(&mut self) -> Reload {
        if let Some(in_flight) = &self.in_flight {
            tracing::trace!(ticket = in_flight.ticket, "Reload deferred behind in-flight fetch");
            self.rerun = true;
            return Reload::Deferred;
        }
        self.rerun = false;

        let fields = self.fields_to_fetch();

        if self.limit == 0 {
            self.window = Some(Window {
                records: Vec::new(),
                fields,
                limit: 0,
            });
            return Reload::Complete;
        }

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        tracing::debug!(
            ticket,
            model = %self.model,
            fields = fields.len(),
            limit = self.limit,
            "Starting list reload"
        );

        let request = FetchRequest {
            ticket,
            model: self.model.clone(),
            domain: self.search.domain.clone(),
            fields: fields.clone(),
            order: order_by_to_string(&self.search.order_by),
            limit: self.limit,
            context: self.search.context.clone(),
        };
        self.in_flight = Some(InFlight {
            ticket,
            fields,
            limit: self.limit,
        });

        Reload::Fetch(request)
    }

    /// Complete the in-flight reload identified by `ticket`.
    ///
    /// On success the window is replaced as a unit and the return value tells
    /// whether another reload is needed right away. On failure the previous
    /// window is kept and the remote error is returned.
    pub fn finish_reload(
        &mut self,
        ticket: u64,
        result: Result<Vec<Record>, RemoteError>,
    ) -> DataResult<bool> {
        let in_flight = match self.in_flight.take() {
            Some(in_flight) if in_flight.ticket == ticket => in_flight,
            other => {
                let expected = other.as_ref().map(|f| f.ticket);
                self.in_flight = other;
                return Err(DataError::StaleTicket {
                    expected,
                    got: ticket,
                });
            }
        };

        let mut records = match result {
            Ok(records) => records,
            Err(err) => {
                tracing::debug!(ticket, error = %err, "List reload failed");
                return Err(err.into());
            }
        };

        if records.len() > in_flight.limit {
            tracing::warn!(
                received = records.len(),
                limit = in_flight.limit,
                "Remote returned more records than requested"
            );
            records.truncate(in_flight.limit);
        }

        tracing::debug!(ticket, records = records.len(), "List reload complete");
        self.window = Some(Window {
            records,
            fields: in_flight.fields,
            limit: in_flight.limit,
        });

        Ok(self.needs_reload())
    }
}

impl std::fmt::Debug for ListDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListDataSource")
            .field("model", &self.model)
            .field("columns", &self.columns)
            .field("limit", &self.limit)
            .field("state", &self.state())
            .field("records", &self.record_count())
            .finish()
    }
}

/// Append `value` unless already present; returns whether it was added
fn push_unique(values: &mut Vec<String>, value: String) -> bool {
    if values.contains(&value) {
        false
    } else {
        values.push(value);
        true
    }
}
