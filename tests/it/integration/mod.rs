//! Integration tests for sheetlist.
//!
//! These tests drive a `ListSession` over a fake remote through complete
//! evaluate/reload turns.
