//! Hosted inference API provider

use crate::config::{ProviderMode, ProviderSettings};
use crate::provider::{ClassificationProvider, Outcome, Readiness};
use async_trait::async_trait;
use labelgate_core::{Error, Result, UNKNOWN_LABEL};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

/// Provider that forwards text to the hosted Hugging Face inference API.
///
/// Each call is a single POST with no retries and no timeout beyond the
/// client default.
pub struct RemoteProvider {
    name: String,
    endpoint: String,
    credential: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

impl RemoteProvider {
    /// Create a remote provider. A missing or blank credential leaves the
    /// provider unconfigured.
    pub fn new(settings: &ProviderSettings, credential: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        let credential = credential.filter(|token| !token.trim().is_empty());

        Ok(Self {
            name: settings.model.clone(),
            endpoint: settings.endpoint(),
            credential,
            client,
        })
    }

    /// URL every classification is posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ClassificationProvider for RemoteProvider {
    async fn classify(&self, text: &str) -> Result<Outcome> {
        let Some(token) = self.credential.as_deref() else {
            return Ok(Outcome::Unconfigured);
        };

        let start = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&InferenceRequest { inputs: text })
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        // Status is ignored; a 503 cold start still carries an `error` body.
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        tracing::debug!(
            status = %status,
            latency_us = start.elapsed().as_micros() as u64,
            "Inference API responded"
        );

        let payload: Value = serde_json::from_str(&body).map_err(|e| {
            Error::provider(format!(
                "Inference API returned a non-JSON body (status {}): {}",
                status, e
            ))
        })?;

        Ok(interpret_inference_response(payload))
    }

    fn readiness(&self) -> Readiness {
        if self.credential.is_some() {
            Readiness::Ready
        } else {
            Readiness::Unconfigured
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn mode(&self) -> ProviderMode {
        ProviderMode::Remote
    }
}

/// Decide what a parsed inference API response means.
///
/// - `[[{label, score}, ...], ...]`: the first entry of the first list is the
///   top result; a missing label becomes `"Desconhecido"`, a missing score
///   `0.0`
/// - `{"error": ...}`: the model is warming up
/// - anything else is kept verbatim for diagnostics
pub fn interpret_inference_response(payload: Value) -> Outcome {
    match &payload {
        Value::Array(outer) => {
            if let [Value::Array(inner), ..] = outer.as_slice() {
                if let [Value::Object(top), ..] = inner.as_slice() {
                    let label = top
                        .get("label")
                        .and_then(Value::as_str)
                        .unwrap_or(UNKNOWN_LABEL)
                        .to_string();
                    let confidence = top.get("score").and_then(Value::as_f64).unwrap_or(0.0);

                    return Outcome::Success { label, confidence };
                }
            }
        }
        Value::Object(fields) => {
            if let Some(error) = fields.get("error") {
                let message = match error {
                    Value::String(message) => message.clone(),
                    other => other.to_string(),
                };
                return Outcome::Warming { message };
            }
        }
        _ => {}
    }

    Outcome::UnexpectedShape { raw: payload }
}
