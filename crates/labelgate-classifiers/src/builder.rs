//! Provider construction from configuration

use crate::config::{ProviderMode, ProviderSettings};
use crate::local::LocalProvider;
use crate::provider::ClassificationProvider;
use crate::remote::RemoteProvider;
use labelgate_core::Result;
use std::sync::Arc;

/// Build the single provider for this deployment.
///
/// `credential` is the bearer token for the hosted API; local mode passes it
/// to the Hub for gated or private repositories.
pub async fn build_provider(
    settings: &ProviderSettings,
    credential: Option<String>,
) -> Result<Arc<dyn ClassificationProvider>> {
    let provider: Arc<dyn ClassificationProvider> = match settings.mode {
        ProviderMode::Local => Arc::new(LocalProvider::load(settings, credential).await),
        ProviderMode::Remote => {
            let provider = RemoteProvider::new(settings, credential)?;
            tracing::info!(endpoint = provider.endpoint(), "Using hosted inference API");
            Arc::new(provider)
        }
    };

    let readiness = provider.readiness();
    if !readiness.is_ready() {
        tracing::warn!(
            mode = %provider.mode(),
            readiness = ?readiness,
            "Provider is not ready; classification requests will fail"
        );
    }

    Ok(provider)
}
