use labelgate_classifiers::ClassificationProvider;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state, built once before the listener starts
#[derive(Clone)]
pub struct AppState {
    /// The single classification provider for this deployment
    pub provider: Arc<dyn ClassificationProvider>,

    /// Prometheus recorder handle; absent when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(provider: Arc<dyn ClassificationProvider>) -> Self {
        Self {
            provider,
            metrics: None,
        }
    }

    /// Render `/metrics` from this recorder
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
