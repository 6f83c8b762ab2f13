//! Labelgate Classifiers
//!
//! Text classification providers behind a single [`ClassificationProvider`]
//! interface.
//!
//! Two providers exist, and exactly one is active per deployment:
//! - [`LocalProvider`]: a sequence-classification model pulled from the
//!   Hugging Face Hub and run in-process with Candle (`ml-models` feature)
//! - [`RemoteProvider`]: the hosted Hugging Face inference API, called with a
//!   bearer token
//!
//! Both report an [`Outcome`] instead of raw provider data, so the HTTP layer
//! never inspects provider-specific JSON.

pub mod builder;
pub mod config;
pub mod local;
#[cfg(feature = "ml-models")]
pub mod model_loader;
pub mod provider;
pub mod remote;

pub use builder::build_provider;
pub use config::{DeviceSpec, ProviderMode, ProviderSettings};
pub use local::LocalProvider;
pub use provider::{ClassificationProvider, Outcome, Readiness};
pub use remote::{interpret_inference_response, RemoteProvider};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{ProviderMode, ProviderSettings};
    pub use crate::provider::{ClassificationProvider, Outcome, Readiness};
}
