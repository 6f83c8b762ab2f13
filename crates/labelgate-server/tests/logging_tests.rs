//! Log levels of the classification handler

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use labelgate_classifiers::{ClassificationProvider, Outcome, ProviderMode, Readiness};
use labelgate_core::Result;
use labelgate_server::{create_router, AppState};
use serde_json::json;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use tracing_subscriber::fmt::MakeWriter;

/// Collects formatted log lines in memory
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

struct FixedProvider(Outcome);

#[async_trait]
impl ClassificationProvider for FixedProvider {
    async fn classify(&self, _text: &str) -> Result<Outcome> {
        Ok(self.0.clone())
    }

    fn readiness(&self) -> Readiness {
        Readiness::Ready
    }

    fn name(&self) -> &str {
        "fixed"
    }

    fn mode(&self) -> ProviderMode {
        ProviderMode::Remote
    }
}

/// Run one classification with logs captured at `info` and above
async fn classify_with_logs(outcome: Outcome) -> String {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer(logs.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let router = create_router(AppState::new(Arc::new(FixedProvider(outcome))));
    let request = Request::builder()
        .method("POST")
        .uri("/analisar-comentario")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"texto": "olá"}).to_string()))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    logs.contents()
}

#[tokio::test(flavor = "current_thread")]
async fn test_warming_is_logged_as_warning() {
    let logs = classify_with_logs(Outcome::Warming {
        message: "model loading".to_string(),
    })
    .await;

    let line = logs
        .lines()
        .find(|line| line.contains("Provider is warming up: model loading"))
        .unwrap_or_else(|| panic!("warming not logged:\n{}", logs));
    assert!(line.contains("WARN"), "{}", line);
}

#[tokio::test(flavor = "current_thread")]
async fn test_classification_is_logged_at_debug() {
    let logs = classify_with_logs(Outcome::Success {
        label: "neither".to_string(),
        confidence: 0.9,
    })
    .await;

    assert!(!logs.contains("Comment classified"), "{}", logs);
}
