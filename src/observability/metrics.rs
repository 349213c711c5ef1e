use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Token acquisition
    pub token_fetch_requests: IntCounter,
    pub token_fetch_failures: IntCounter,

    // Verification endpoint
    pub verify_requests: IntCounterVec,
    pub verify_rejections: IntCounterVec,

    // Runtime
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("idvagent".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            token_fetch_requests: IntCounter::new(
                "token_fetch_requests_total",
                "Total token acquisition attempts",
            )
            .unwrap(),
            token_fetch_failures: IntCounter::new(
                "token_fetch_failures_total",
                "Token acquisition failures",
            )
            .unwrap(),

            verify_requests: IntCounterVec::new(
                Opts::new("verify_requests_total", "Verification requests by outcome"),
                &["outcome"],
            )
            .unwrap(),
            verify_rejections: IntCounterVec::new(
                Opts::new(
                    "verify_rejections_total",
                    "Verification rejections by failed stage",
                ),
                &["stage"],
            )
            .unwrap(),

            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_fetch_requests.clone())).unwrap();
        reg.register(Box::new(metrics.token_fetch_failures.clone())).unwrap();
        reg.register(Box::new(metrics.verify_requests.clone())).unwrap();
        reg.register(Box::new(metrics.verify_rejections.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
