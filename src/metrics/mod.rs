//! Prometheus collectors for the advisor cache.
//!
//! Collectors are process-wide, matching the one-cache-per-process model.
//! Nothing is served from here; embedders register the collectors into their
//! own registry or scrape [`REGISTRY`] through [`render_metrics`].


use lazy_static::lazy_static;
use prometheus::exponential_buckets;
use prometheus::Encoder;
use prometheus::Histogram;
use prometheus::HistogramOpts;
use prometheus::IntCounter;
use prometheus::IntCounterVec;
use prometheus::IntGauge;
use prometheus::Opts;
use prometheus::Registry;
use tracing::error;

lazy_static! {
    pub static ref ADVISOR_GENERATION: IntGauge = IntGauge::new(
        "advisor_generation",
        "Id of the currently published advisor generation"
    )
    .expect("metric can not be created");

    pub static ref ADVISOR_COUNT: IntGauge = IntGauge::new(
        "advisor_count",
        "Number of advisors in the currently published generation"
    )
    .expect("metric can not be created");

    pub static ref ADVISOR_COMPILE_FAILURES: IntCounter = IntCounter::new(
        "advisor_compile_failures",
        "Pointcut updates rejected by the compiler"
    )
    .expect("metric can not be created");

    pub static ref ADVISOR_COMPILE_DURATION_MS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "advisor_compile_duration_ms",
            "Histogram of pointcut compile duration in ms"
        )
        .buckets(exponential_buckets(0.05, 2.0, 16).unwrap())
    )
    .expect("metric can not be created");

    pub static ref ADVISOR_DRIFT_CHECKS: IntCounterVec = IntCounterVec::new(
        Opts::new("advisor_drift_checks", "Drift checks by outcome"),
        &["outcome"]
    )
    .expect("metric can not be created");

    pub static ref REGISTRY: Registry = {
        let registry = Registry::new();
        register_custom_metrics(&registry);
        registry
    };
}

/// Registers every advisor cache collector into `registry`
pub fn register_custom_metrics(registry: &Registry) {
    registry
        .register(Box::new(ADVISOR_GENERATION.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(ADVISOR_COUNT.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(ADVISOR_COMPILE_FAILURES.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(ADVISOR_COMPILE_DURATION_MS.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(ADVISOR_DRIFT_CHECKS.clone()))
        .expect("collector can be registered");
}

/// Text exposition of [`REGISTRY`]
pub fn render_metrics() -> String {
    let encoder = prometheus::TextEncoder::new();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        error!("could not encode advisor metrics: {}", e);
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(v) => v,
        Err(e) => {
            error!("advisor metrics could not be from_utf8'd: {}", e);
            String::new()
        }
    }
}
