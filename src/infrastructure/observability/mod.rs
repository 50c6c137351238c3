//! Observability infrastructure - Tracing and Metrics

mod config;
mod metrics;
mod tracing_setup;

pub use config::{MetricsConfig, ObservabilityConfig, TracingConfig};
pub use metrics::{
    create_metrics_router, init_metrics, record_cache_lookup, record_http_request,
    record_search_outcome, record_upstream_call, PrometheusMetrics, SearchOutcome, UpstreamStage,
};
pub use tracing_setup::{init_tracing, shutdown_tracing};
