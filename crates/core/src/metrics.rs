//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Compilation outcomes
//! - Per-strategy attempts and latency
//! - Artifact recording

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Compilation Metrics
// =============================================================================

/// Compile calls by final result.
pub static COMPILATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("quali_compilations_total", "Total compile calls"),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// Strategy attempts by strategy and result.
pub static STRATEGY_ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "quali_compile_strategy_attempts_total",
            "Compilation attempts per strategy",
        ),
        &["strategy", "result"], // result: "success" or a failure reason label
    )
    .unwrap()
});

/// Strategy attempt duration in seconds.
pub static STRATEGY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "quali_compile_strategy_duration_seconds",
            "Duration of a single compilation strategy attempt",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["strategy"],
    )
    .unwrap()
});

// =============================================================================
// Artifact Metrics
// =============================================================================

/// Artifact markers persisted by result.
pub static ARTIFACTS_RECORDED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "quali_artifacts_recorded_total",
            "Compiled artifact markers written to storage",
        ),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// All core metrics, for registration with a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(COMPILATIONS_TOTAL.clone()),
        Box::new(STRATEGY_ATTEMPTS.clone()),
        Box::new(STRATEGY_DURATION.clone()),
        Box::new(ARTIFACTS_RECORDED.clone()),
    ]
}
