use axum::{
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use rust_embed::Embed;

use crate::error::AppError;

#[derive(Embed)]
#[folder = "web"]
struct WebAssets;

/// Serve the chat page
pub async fn index() -> Html<String> {
    match <WebAssets as Embed>::get("index.html") {
        Some(content) => Html(String::from_utf8_lossy(&content.data).into_owned()),
        None => Html(FALLBACK_HTML.to_string()),
    }
}

/// Serve any other embedded asset by path
pub async fn serve_static(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    if path.is_empty() {
        return index().await.into_response();
    }

    match <WebAssets as Embed>::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => AppError::NotFound.into_response(),
    }
}

const FALLBACK_HTML: &str = r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Classificador de Comentários</title>
</head>
<body>
    <h1>Classificador de Comentários</h1>
    <form id="form">
        <textarea id="texto" rows="4" cols="60" placeholder="Digite um comentário..."></textarea>
        <button type="submit">Analisar</button>
    </form>
    <pre id="resultado"></pre>
    <script>
        document.getElementById('form').addEventListener('submit', async (e) => {
            e.preventDefault();
            const texto = document.getElementById('texto').value.trim();
            if (!texto) return;
            const out = document.getElementById('resultado');
            try {
                const res = await fetch('/analisar-comentario', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ texto })
                });
                out.textContent = JSON.stringify(await res.json(), null, 2);
            } catch (err) {
                out.textContent = 'Erro ao classificar';
            }
        });
    </script>
</body>
</html>
"#;
