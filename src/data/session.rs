//! The owning loop of a list data source.
//!
//! A spreadsheet evaluates many cells per turn. [`ListSession`] collects the
//! widen requests of every pending read in the current turn and, when the turn
//! ends, applies them all and issues a single reload. Reads issued after
//! [`ListSession::end_turn`] returns observe every column and row requested up
//! to that point.

use tracing::{debug, warn};

use crate::constants::DEFAULT_SLOW_FETCH_MS;
use crate::data::error::DataResult;
use crate::data::list_source::{CellRead, ListDataSource, LoadState, Reload, Widen};
use crate::data::remote::SearchRead;
use crate::perf::{measure, FetchStats};
use crate::settings::ListSettings;
use crate::types::RecordId;

/// A data source paired with its remote and a per-turn reload queue.
pub struct ListSession<R> {
    source: ListDataSource,
    remote: R,
    /// Widen requests collected during the current turn
    pending: Vec<Widen>,
    /// A coalesced reload will run at the end of the turn
    reload_scheduled: bool,
    stats: FetchStats,
    slow_fetch_ms: f64,
}

impl<R: SearchRead> ListSession<R> {
    pub fn new(source: ListDataSource, remote: R) -> Self {
        Self {
            source,
            remote,
            pending: Vec::new(),
            reload_scheduled: false,
            stats: FetchStats::new(),
            slow_fetch_ms: DEFAULT_SLOW_FETCH_MS,
        }
    }

    pub fn with_settings(mut self, settings: &ListSettings) -> Self {
        self.slow_fetch_ms = settings.slow_fetch_ms;
        self
    }

    pub fn source(&self) -> &ListDataSource {
        &self.source
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn stats(&self) -> &FetchStats {
        &self.stats
    }

    pub fn state(&self) -> LoadState {
        self.source.state()
    }

    /// Whether a coalesced reload is waiting for the end of the turn
    pub fn is_reload_scheduled(&self) -> bool {
        self.reload_scheduled
    }

    /// Load the requested projection now, outside of any turn.
    ///
    /// Any widen request collected so far is applied first.
    pub fn load(&mut self) -> DataResult<usize> {
        self.apply_pending();
        self.reload_scheduled = false;
        self.run_reloads()
    }

    pub fn get_id_from_position(&self, position: usize) -> DataResult<Option<RecordId>> {
        self.source.get_id_from_position(position)
    }

    pub fn get_list_header_value(&self, field: &str) -> DataResult<String> {
        self.source.get_list_header_value(field)
    }

    /// Read a cell; a pending read queues its widen request for this turn.
    pub fn get_list_cell_value(&mut self, position: usize, field: &str) -> DataResult<CellRead> {
        let read = self.source.get_list_cell_value(position, field)?;
        if let CellRead::Pending(widen) = &read {
            self.request(widen.clone());
        }
        Ok(read)
    }

    /// Queue a widen request and schedule the turn's reload.
    ///
    /// Returns `true` only for the request that scheduled the reload; later
    /// requests in the same turn ride along with it.
    pub fn request(&mut self, widen: Widen) -> bool {
        if !self.pending.contains(&widen) {
            self.pending.push(widen);
        }
        if self.reload_scheduled {
            return false;
        }
        self.reload_scheduled = true;
        true
    }

    /// End the current turn: apply the collected widen requests and run the
    /// coalesced reload, if one was scheduled. Returns the number of remote
    /// fetches issued.
    pub fn end_turn(&mut self) -> DataResult<usize> {
        if !self.reload_scheduled {
            return Ok(0);
        }
        self.reload_scheduled = false;
        self.apply_pending();
        self.run_reloads()
    }

    fn apply_pending(&mut self) {
        for widen in self.pending.drain(..) {
            self.source.widen(widen);
        }
    }

    /// Reload until the window matches the requested projection
    fn run_reloads(&mut self) -> DataResult<usize> {
        crate::profile_scope!("ListSession::run_reloads");

        let mut fetches = 0;
        loop {
            let request = match self.source.begin_reload() {
                Reload::Fetch(request) => request,
                Reload::Complete => {
                    debug!(model = self.source.model(), "Empty list loaded without fetching");
                    return Ok(fetches);
                }
                Reload::Deferred => return Ok(fetches),
            };

            let (result, elapsed_ms) = measure(|| self.remote.search_read(&request));
            fetches += 1;
            self.stats.record(elapsed_ms);
            if elapsed_ms > self.slow_fetch_ms {
                warn!(
                    model = %request.model,
                    limit = request.limit,
                    elapsed_ms = format!("{:.2}", elapsed_ms),
                    "Slow list fetch"
                );
            }

            if !self.source.finish_reload(request.ticket, result)? {
                return Ok(fetches);
            }
        }
    }
}
