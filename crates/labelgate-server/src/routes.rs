//! HTTP routes and handlers

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use labelgate_classifiers::Outcome;
use labelgate_core::{ClassificationRequest, ClassificationResponse, LabelCategory};

use crate::error::AppError;
use crate::state::AppState;
use crate::static_files;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(static_files::index))
        // Comment length is not limited
        .route(
            "/analisar-comentario",
            post(analyze_comment).layer(DefaultBodyLimit::disable()),
        )
        .route("/health", get(health_check))
        .route("/metrics", get(render_metrics))
        .fallback(static_files::serve_static)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let provider = &state.provider;
    Json(json!({
        "status": "ok",
        "provider": provider.name(),
        "mode": provider.mode().as_str(),
        "ready": provider.readiness().is_ready(),
    }))
}

async fn render_metrics(State(state): State<AppState>) -> String {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

/// Classify a comment through the configured provider
#[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
async fn analyze_comment(
    State(state): State<AppState>,
    payload: Result<Json<ClassificationRequest>, JsonRejection>,
) -> Result<Json<ClassificationResponse>, AppError> {
    metrics::counter!("labelgate_requests_total").increment(1);

    let Json(request) = payload.map_err(|rejection| {
        metrics::counter!("labelgate_errors_total", "kind" => "invalid_request").increment(1);
        warn!("Rejected request body: {}", rejection.body_text());
        AppError::InvalidRequest(rejection.body_text())
    })?;

    let provider = &state.provider;

    // A provider that cannot serve is never called
    if let Some(outcome) = provider.readiness().as_outcome() {
        record_outcome(&outcome);
        return Err(not_ready(outcome));
    }

    debug!(chars = request.texto.chars().count(), "Classifying comment");

    let start = Instant::now();
    let result = provider.classify(&request.texto).await;
    let latency_us = start.elapsed().as_micros() as u64;
    metrics::histogram!("labelgate_provider_latency_us").record(latency_us as f64);

    let outcome = result.map_err(|e| {
        error!(provider = provider.name(), "Classification failed: {}", e);
        metrics::counter!("labelgate_errors_total", "kind" => e.kind()).increment(1);
        AppError::from(e)
    })?;

    record_outcome(&outcome);

    let text = request.texto;
    let response = match outcome {
        Outcome::Success { label, confidence } => {
            let category = LabelCategory::from_label(&label);
            debug!(
                label = %label,
                category = %category,
                confidence,
                latency_us,
                "Comment classified"
            );
            ClassificationResponse::labeled(text, label, confidence)
        }
        Outcome::Warming { message } => {
            warn!("Provider is warming up: {}", message);
            ClassificationResponse::warming(text, message)
        }
        Outcome::UnexpectedShape { raw } => {
            warn!("Unexpected provider response: {}", raw);
            ClassificationResponse::unexpected(text, raw.to_string())
        }
        other @ (Outcome::Unavailable { .. } | Outcome::Unconfigured) => {
            return Err(not_ready(other));
        }
    };

    Ok(Json(response))
}

fn record_outcome(outcome: &Outcome) {
    metrics::counter!("labelgate_outcomes_total", "outcome" => outcome.kind()).increment(1);

    if let Outcome::Success { label, .. } = outcome {
        let category = LabelCategory::from_label(label);
        metrics::counter!("labelgate_classifications_total", "category" => category.as_str())
            .increment(1);
    }
}

fn not_ready(outcome: Outcome) -> AppError {
    match outcome {
        Outcome::Unavailable { reason } => {
            error!("Provider unavailable: {}", reason);
            AppError::ProviderUnavailable(reason)
        }
        Outcome::Unconfigured => {
            error!("Provider has no API token configured");
            AppError::ProviderUnconfigured
        }
        other => AppError::Processing(format!("unexpected outcome {}", other.kind())),
    }
}

