//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the quali server:
//! - HTTP request metrics (latency, counts, in flight)
//! - Stored artifact count (collected dynamically)
//! - Core compilation metrics (registered from `quali_core::metrics`)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use regex_lite::Regex;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "quali_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("quali_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "quali_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Artifact Metrics (collected dynamically)
// =============================================================================

/// Identifiers with a compiled artifact marker.
pub static ARTIFACTS_STORED: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "quali_artifacts_stored",
        "Number of identifiers with a compiled artifact marker",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    let mut collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // HTTP
        Box::new(HTTP_REQUEST_DURATION.clone()),
        Box::new(HTTP_REQUESTS_TOTAL.clone()),
        Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()),
        // Artifacts
        Box::new(ARTIFACTS_STORED.clone()),
    ];

    // Core metrics (compilations, strategies, artifact writer)
    collectors.extend(quali_core::metrics::all_metrics());

    for collector in collectors {
        if let Err(e) = registry.register(collector) {
            tracing::warn!("Failed to register metric: {}", e);
        }
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Refresh gauges that mirror application state.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    if let Ok(count) = state.artifact_store().count() {
        ARTIFACTS_STORED.set(count);
    }
}

static ARTIFACT_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(/api/v1/artifacts)/[^/]+$").unwrap());

/// Normalize a path for metric labels (replace identifiers with placeholders).
pub fn normalize_path(path: &str) -> String {
    ARTIFACT_PATH
        .replace(path, "$1/{identifier}")
        .into_owned()
}
