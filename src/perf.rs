//! Reload timing.
//!
//! Remote fetches dominate the cost of a list, so every reload is timed:
//! [`ScopedTimer`] warns when one exceeds its threshold and [`FetchStats`]
//! keeps rolling statistics per session.
//!
//! ## Usage
//!
//! Enable detailed instrumentation with the `profiling` feature flag:
//! ```toml
//! [dependencies]
//! sheetlist = { features = ["profiling"] }
//! ```
//!
//! ```ignore
//! fn reload() {
//!     profile_scope!("reload");
//!     // ... work ...
//! }
//! ```

use std::collections::VecDeque;
use std::time::Instant;
#[cfg(feature = "profiling")]
use tracing::trace;
#[cfg(not(feature = "profiling"))]
use tracing::warn;

use crate::constants::FETCH_STATS_SAMPLES;

// ============================================================================
// Profiling Macros (zero-cost when disabled)
// ============================================================================

/// Profile a scope with the given name. Zero-cost when profiling is disabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::for_profiling($name);
        #[cfg(not(feature = "profiling"))]
        let _ = $name;
    };
}

pub use profile_scope;

// ============================================================================
// Fetch Statistics
// ============================================================================

/// Rolling statistics over recent reload durations.
#[derive(Debug, Clone)]
pub struct FetchStats {
    /// Recent timing samples in milliseconds
    samples: VecDeque<f64>,
    /// Total fetch count
    count: u64,
    /// Maximum observed time
    max_ms: f64,
    /// Running sum over `samples`
    sum_ms: f64,
}

impl Default for FetchStats {
    fn default() -> Self {
        Self {
            samples: VecDeque::with_capacity(FETCH_STATS_SAMPLES),
            count: 0,
            max_ms: 0.0,
            sum_ms: 0.0,
        }
    }
}

impl FetchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new timing sample.
    pub fn record(&mut self, ms: f64) {
        if self.samples.len() >= FETCH_STATS_SAMPLES {
            if let Some(old) = self.samples.pop_front() {
                self.sum_ms -= old;
            }
        }
        self.samples.push_back(ms);
        self.sum_ms += ms;
        self.count += 1;
        self.max_ms = self.max_ms.max(ms);
    }

    /// Total number of fetches recorded
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Slowest fetch seen
    pub fn max(&self) -> f64 {
        self.max_ms
    }

    /// Average time over recent samples.
    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.sum_ms / self.samples.len() as f64
        }
    }

    /// The p95 (95th percentile) time over recent samples.
    pub fn p95(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let mut sorted: Vec<f64> = self.samples.iter().copied().collect();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let idx = ((sorted.len() as f64) * 0.95).floor() as usize;
        sorted.get(idx.min(sorted.len() - 1)).copied().unwrap_or(0.0)
    }
}

// ============================================================================
// Scoped Timer
// ============================================================================

/// RAII timer that logs when the scope takes longer than its threshold.
pub struct ScopedTimer {
    name: &'static str,
    start: Instant,
    threshold_ms: f64,
}

impl ScopedTimer {
    /// Create a new scoped timer with a warning threshold.
    pub fn new(name: &'static str, threshold_ms: f64) -> Self {
        Self {
            name,
            start: Instant::now(),
            threshold_ms,
        }
    }

    /// Create a timer for profiling (1ms threshold).
    pub fn for_profiling(name: &'static str) -> Self {
        Self::new(name, 1.0)
    }

    /// Get elapsed time without stopping the timer.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        if elapsed_ms <= self.threshold_ms {
            return;
        }

        #[cfg(feature = "profiling")]
        trace!("[PERF] {}: {:.2}ms", self.name, elapsed_ms);

        #[cfg(not(feature = "profiling"))]
        warn!(
            operation = self.name,
            elapsed_ms = format!("{:.2}", elapsed_ms),
            threshold_ms = format!("{:.2}", self.threshold_ms),
            "Slow operation"
        );
    }
}

/// Measure execution time of a closure and return both the result and elapsed time.
#[inline]
pub fn measure<T, F: FnOnce() -> T>(f: F) -> (T, f64) {
    let start = Instant::now();
    let result = f();
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    (result, elapsed_ms)
}
