//! HTTP error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Errors surfaced to clients as `{"detail": "..."}`
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The local model failed to load at startup
    #[error("O modelo de IA não foi carregado corretamente.")]
    ProviderUnavailable(String),

    /// No credential for the hosted inference API
    #[error("Token da API não configurado no servidor.")]
    ProviderUnconfigured,

    /// The provider call failed
    #[error("Erro no processamento da IA: {0}")]
    Processing(String),

    /// The request body could not be read
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Not Found")]
    NotFound,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ProviderUnavailable(_) | Self::ProviderUnconfigured | Self::Processing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl From<labelgate_core::Error> for AppError {
    fn from(err: labelgate_core::Error) -> Self {
        AppError::Processing(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = json!({ "detail": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_500() {
        assert_eq!(
            AppError::ProviderUnavailable("boom".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::ProviderUnconfigured.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unavailable_detail_hides_reason() {
        let err = AppError::ProviderUnavailable("/root/.cache path missing".to_string());
        assert_eq!(
            err.to_string(),
            "O modelo de IA não foi carregado corretamente."
        );
    }

    #[test]
    fn test_core_error_becomes_processing_error() {
        let err: AppError = labelgate_core::Error::transport("connection reset").into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "Erro no processamento da IA: transport error: connection reset"
        );
    }
}
