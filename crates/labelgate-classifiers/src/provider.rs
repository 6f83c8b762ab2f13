//! Provider trait and outcome types

use crate::config::ProviderMode;
use async_trait::async_trait;
use labelgate_core::Result;

/// Trait for all classification providers
#[async_trait]
pub trait ClassificationProvider: Send + Sync {
    /// Classify the given text.
    ///
    /// `Err` is reserved for transport failures and provider exceptions;
    /// every answer the provider gave, usable or not, is an [`Outcome`].
    async fn classify(&self, text: &str) -> Result<Outcome>;

    /// Whether the provider can be called at all
    fn readiness(&self) -> Readiness;

    /// Get the provider name (usually the model repository)
    fn name(&self) -> &str;

    /// Get the provider mode
    fn mode(&self) -> ProviderMode;
}

/// Result of a single classification call
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Top-ranked label reported by the provider
    Success { label: String, confidence: f64 },

    /// The hosted model is still starting up
    Warming { message: String },

    /// The provider answered with a shape we do not understand
    UnexpectedShape { raw: serde_json::Value },

    /// The local model failed to load at startup
    Unavailable { reason: String },

    /// No credential was configured for the hosted API
    Unconfigured,
}

impl Outcome {
    /// Short, stable name of the outcome, used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Warming { .. } => "warming",
            Self::UnexpectedShape { .. } => "unexpected_shape",
            Self::Unavailable { .. } => "unavailable",
            Self::Unconfigured => "unconfigured",
        }
    }
}

/// Whether a provider can serve requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    Unavailable { reason: String },
    Unconfigured,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// The outcome every call reports while the provider is not ready
    pub fn as_outcome(&self) -> Option<Outcome> {
        match self {
            Self::Ready => None,
            Self::Unavailable { reason } => Some(Outcome::Unavailable {
                reason: reason.clone(),
            }),
            Self::Unconfigured => Some(Outcome::Unconfigured),
        }
    }
}
