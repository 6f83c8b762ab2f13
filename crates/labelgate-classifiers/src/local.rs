//! In-process provider backed by a Candle sequence classifier

use crate::config::{ProviderMode, ProviderSettings};
#[cfg(feature = "ml-models")]
use crate::model_loader::SequenceClassifier;
use crate::provider::{ClassificationProvider, Outcome, Readiness};
use async_trait::async_trait;
use labelgate_core::Result;
#[cfg(feature = "ml-models")]
use std::sync::Arc;

/// Provider running the classification model inside the server process.
///
/// The model is loaded once. A failed load is final: the provider stays
/// unavailable for the life of the process and never touches the model.
pub struct LocalProvider {
    name: String,
    state: LocalState,
}

enum LocalState {
    #[cfg(feature = "ml-models")]
    Loaded(Arc<SequenceClassifier>),
    Unavailable(String),
}

impl LocalProvider {
    /// Fetch and load the configured model on a blocking thread.
    ///
    /// Never fails: any error is recorded and reported by every later call.
    pub async fn load(settings: &ProviderSettings, token: Option<String>) -> Self {
        let name = settings.model.clone();

        #[cfg(feature = "ml-models")]
        {
            tracing::info!(model = %name, "Loading classification model (first run downloads it)");

            let load_settings = settings.clone();
            let loaded = tokio::task::spawn_blocking(move || {
                SequenceClassifier::load(&load_settings, token)
            })
            .await;

            match loaded {
                Ok(Ok(model)) => {
                    tracing::info!(
                        model = %name,
                        architecture = model.architecture(),
                        "Classification model loaded"
                    );
                    Self {
                        name,
                        state: LocalState::Loaded(Arc::new(model)),
                    }
                }
                Ok(Err(e)) => {
                    tracing::error!(model = %name, error = %e, "Failed to load classification model");
                    Self::unavailable(name, e.to_string())
                }
                Err(e) => {
                    tracing::error!(model = %name, error = %e, "Model loading task failed");
                    Self::unavailable(name, format!("model loading task failed: {}", e))
                }
            }
        }

        #[cfg(not(feature = "ml-models"))]
        {
            let _ = token;
            tracing::error!(
                model = %name,
                "Local inference requires the 'ml-models' feature"
            );
            Self::unavailable(name, "built without the 'ml-models' feature")
        }
    }

    /// A provider whose model could not be loaded
    pub fn unavailable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: LocalState::Unavailable(reason.into()),
        }
    }
}

#[async_trait]
impl ClassificationProvider for LocalProvider {
    async fn classify(&self, text: &str) -> Result<Outcome> {
        match &self.state {
            #[cfg(feature = "ml-models")]
            LocalState::Loaded(model) => {
                let model = Arc::clone(model);
                let text = text.to_string();

                let prediction = tokio::task::spawn_blocking(move || model.predict(&text))
                    .await
                    .map_err(|e| {
                        labelgate_core::Error::internal(format!("inference task failed: {}", e))
                    })??;

                Ok(Outcome::Success {
                    label: prediction.label,
                    confidence: f64::from(prediction.score),
                })
            }
            LocalState::Unavailable(reason) => Ok(Outcome::Unavailable {
                reason: reason.clone(),
            }),
        }
    }

    fn readiness(&self) -> Readiness {
        match &self.state {
            #[cfg(feature = "ml-models")]
            LocalState::Loaded(_) => Readiness::Ready,
            LocalState::Unavailable(reason) => Readiness::Unavailable {
                reason: reason.clone(),
            },
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn mode(&self) -> ProviderMode {
        ProviderMode::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unavailable_provider_reports_unavailable() {
        let provider = LocalProvider::unavailable("test/model", "download failed");

        assert_eq!(
            provider.readiness(),
            Readiness::Unavailable {
                reason: "download failed".to_string()
            }
        );

        for text in ["", "qualquer texto", "outro texto"] {
            let outcome = provider.classify(text).await.unwrap();
            assert_eq!(
                outcome,
                Outcome::Unavailable {
                    reason: "download failed".to_string()
                }
            );
        }

        assert_eq!(provider.mode(), ProviderMode::Local);
        assert_eq!(provider.name(), "test/model");
    }
}
