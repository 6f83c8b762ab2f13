//! Core types for Labelgate

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label reported while a hosted model is still warming up
pub const LOADING_LABEL: &str = "Carregando...";

/// Label reported when the provider answered with an unrecognized shape
pub const API_ERROR_LABEL: &str = "Erro API";

/// Label used when the provider result carries no label
pub const UNKNOWN_LABEL: &str = "Desconhecido";

/// Inbound body of `POST /analisar-comentario`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationRequest {
    /// Free text to classify. Empty text is passed through unchanged.
    pub texto: String,
}

impl ClassificationRequest {
    pub fn new(texto: impl Into<String>) -> Self {
        Self {
            texto: texto.into(),
        }
    }
}

/// Normalized classification answer sent back to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResponse {
    /// The text that was classified, echoed back
    pub comentario_original: String,

    /// Label assigned by the provider, or a sentinel label
    pub classificacao: String,

    /// Confidence score (0.0-1.0)
    pub confianca: f64,

    /// Informational notice (model warming up)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aviso: Option<String>,

    /// Diagnostic payload (unexpected provider response)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detalhe: Option<String>,
}

impl ClassificationResponse {
    /// A regular classification result
    pub fn labeled(text: impl Into<String>, label: impl Into<String>, confidence: f64) -> Self {
        Self {
            comentario_original: text.into(),
            classificacao: label.into(),
            confianca: confidence,
            aviso: None,
            detalhe: None,
        }
    }

    /// The provider is still starting; carries the provider's message
    pub fn warming(text: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            aviso: Some(message.into()),
            ..Self::labeled(text, LOADING_LABEL, 0.0)
        }
    }

    /// The provider answered with something we could not interpret
    pub fn unexpected(text: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            detalhe: Some(raw.into()),
            ..Self::labeled(text, API_ERROR_LABEL, 0.0)
        }
    }
}

/// Display category a provider label falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelCategory {
    /// Hate speech
    Hate,
    /// Offensive language
    Offensive,
    /// Spam or junk
    Spam,
    /// Neutral / safe
    Neither,
    /// Anything that matched none of the above
    Unknown,
}

impl LabelCategory {
    /// Categorize a provider label.
    ///
    /// Matches case-insensitively on the category name appearing anywhere in
    /// the label, or on the positional codes `label_0`..`label_3`.
    pub fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();

        if label.contains("hate") || label == "label_1" {
            Self::Hate
        } else if label.contains("offensive") || label == "label_2" {
            Self::Offensive
        } else if label.contains("spam") || label == "label_3" {
            Self::Spam
        } else if label.contains("neither") || label == "label_0" {
            Self::Neither
        } else {
            Self::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hate => "hate",
            Self::Offensive => "offensive",
            Self::Spam => "spam",
            Self::Neither => "neither",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for LabelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
