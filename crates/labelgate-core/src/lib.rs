//! Labelgate Core
//!
//! Core types and utilities shared across Labelgate components.
//!
//! This crate provides:
//! - Error types and result handling
//! - Wire types for the classification endpoint
//! - Label categories used for display and metrics

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    ClassificationRequest, ClassificationResponse, LabelCategory, API_ERROR_LABEL, LOADING_LABEL,
    UNKNOWN_LABEL,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{ClassificationRequest, ClassificationResponse, LabelCategory};
}
