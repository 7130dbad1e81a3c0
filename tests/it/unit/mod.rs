//! Unit tests for sheetlist.

mod perf_tests;
mod settings_tests;
mod snapshot_tests;
