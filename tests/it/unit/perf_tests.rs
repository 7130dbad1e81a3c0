//! Unit tests for perf module.

use sheetlist::perf::{measure, FetchStats, ScopedTimer};

#[test]
fn test_fetch_stats_empty() {
    let stats = FetchStats::new();
    assert_eq!(stats.count(), 0);
    assert_eq!(stats.average(), 0.0);
    assert_eq!(stats.p95(), 0.0);
}

#[test]
fn test_fetch_stats_recording() {
    let mut stats = FetchStats::new();
    stats.record(5.0);
    stats.record(10.0);
    stats.record(15.0);

    // Average should be (5 + 10 + 15) / 3 = 10
    assert!((stats.average() - 10.0).abs() < 0.001);
    assert_eq!(stats.count(), 3);
    assert_eq!(stats.max(), 15.0);
    assert_eq!(stats.p95(), 15.0);
}

#[test]
fn test_fetch_stats_window_rolls() {
    let mut stats = FetchStats::new();
    for _ in 0..100 {
        stats.record(1.0);
    }
    for _ in 0..100 {
        stats.record(3.0);
    }
    assert_eq!(stats.count(), 200);
    assert!((stats.average() - 3.0).abs() < 0.001);
    assert_eq!(stats.max(), 3.0);
}

#[test]
fn test_scoped_timer_creation() {
    // Threshold is high, so dropping must not warn
    let timer = ScopedTimer::new("test_op", 1000.0);
    assert_eq!(timer.name(), "test_op");
    assert!(timer.elapsed_ms() >= 0.0);
}

#[test]
fn test_measure_returns_result() {
    let (value, elapsed) = measure(|| 40 + 2);
    assert_eq!(value, 42);
    assert!(elapsed >= 0.0);
}
