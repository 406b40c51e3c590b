use lenslink::config::StoreConfig;
use lenslink::marketplace::Marketplace;
use lenslink::store::Store;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Marketplace over the process-local store. Records live for the lifetime of the process.
pub(crate) fn in_memory_marketplace(config: &StoreConfig) -> Arc<Marketplace> {
    Arc::new(Marketplace::new(Store::in_memory(config)))
}
