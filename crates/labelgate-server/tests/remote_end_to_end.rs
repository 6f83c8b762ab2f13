//! End-to-end: HTTP handler -> RemoteProvider -> fake inference API

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    routing::post,
    Json, Router,
};
use labelgate_classifiers::{build_provider, ProviderMode, ProviderSettings};
use labelgate_server::{create_router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn spawn_inference_api(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/models", addr)
}

async fn labelgate(api_base: String, token: Option<&str>) -> Router {
    let settings = ProviderSettings {
        mode: ProviderMode::Remote,
        model: "test-org/email-classifier".to_string(),
        api_base,
        ..Default::default()
    };

    let provider = build_provider(&settings, token.map(str::to_string))
        .await
        .unwrap();
    create_router(AppState::new(provider))
}

async fn analyze(router: Router, texto: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/analisar-comentario")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "texto": texto }).to_string()))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_loading_model_is_reported_as_warming() {
    let api = Router::new().route(
        "/models/*model",
        post(|| async {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"error": "model loading", "estimated_time": 20.0})),
            )
        }),
    );
    let api_base = spawn_inference_api(api).await;

    let (status, body) = analyze(labelgate(api_base, Some("hf_token")).await, "olá").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "comentario_original": "olá",
            "classificacao": "Carregando...",
            "confianca": 0.0,
            "aviso": "model loading"
        })
    );
}

#[tokio::test]
async fn test_top_label_is_returned() {
    let api = Router::new().route(
        "/models/*model",
        post(|| async {
            Json(json!([[
                {"label": "offensive_language", "score": 0.81},
                {"label": "neither", "score": 0.19}
            ]]))
        }),
    );
    let api_base = spawn_inference_api(api).await;

    let (status, body) = analyze(labelgate(api_base, Some("hf_token")).await, "seu idiota").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["classificacao"], "offensive_language");
    assert_eq!(body["confianca"], 0.81);
}

#[tokio::test]
async fn test_missing_token_is_500() {
    // Nothing listens here; an unconfigured provider never dials out
    let (status, body) = analyze(
        labelgate("http://127.0.0.1:9/models".to_string(), None).await,
        "olá",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Token da API não configurado no servidor.");
}

#[tokio::test]
async fn test_non_json_reply_is_500() {
    let api = Router::new().route("/models/*model", post(|| async { "<html>bad gateway</html>" }));
    let api_base = spawn_inference_api(api).await;

    let (status, body) = analyze(labelgate(api_base, Some("hf_token")).await, "olá").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Erro no processamento da IA: "));
}
