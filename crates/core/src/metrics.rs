//! Conversion metrics.
//!
//! Collectors are created lazily and registered by the server via
//! [`all_metrics`].

use once_cell::sync::Lazy;
use prometheus::{core::Collector, Histogram, HistogramOpts, IntCounterVec, Opts};

/// Finished conversions by outcome.
pub static CONVERSIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("spodl_conversions_total", "Finished conversions by outcome"),
        &["outcome"],
    )
    .unwrap()
});

/// Upstream requests by stage and result.
pub static UPSTREAM_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "spodl_upstream_requests_total",
            "Requests sent to the conversion API",
        ),
        &["stage", "result"],
    )
    .unwrap()
});

/// Progress polls needed per conversion that reached the polling stage.
pub static POLL_ATTEMPTS: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "spodl_poll_attempts",
            "Progress polls per conversion",
        )
        .buckets(vec![1.0, 2.0, 3.0, 5.0, 8.0, 10.0, 15.0, 20.0, 30.0]),
    )
    .unwrap()
});

/// All core collectors, for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn Collector>> {
    vec![
        Box::new(CONVERSIONS_TOTAL.clone()),
        Box::new(UPSTREAM_REQUESTS_TOTAL.clone()),
        Box::new(POLL_ATTEMPTS.clone()),
    ]
}
