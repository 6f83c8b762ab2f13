//! Provider configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default model repository on the Hugging Face Hub
pub const DEFAULT_MODEL: &str = "MagnusFelintoMV/ClassificacaoEmail";

/// Default base URL of the hosted inference API
pub const DEFAULT_API_BASE: &str = "https://api-inference.huggingface.co/models";

/// Which provider implementation serves requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderMode {
    /// Run the model in-process
    #[default]
    Local,
    /// Proxy to the hosted inference API
    Remote,
}

impl ProviderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for ProviderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "in-process" => Ok(Self::Local),
            "remote" | "api" => Ok(Self::Remote),
            other => Err(format!(
                "unknown provider mode '{}' (expected 'local' or 'remote')",
                other
            )),
        }
    }
}

/// Process-wide provider configuration, read once at startup.
///
/// The bearer credential is not part of this struct. It is read from the
/// environment and never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Provider implementation
    #[serde(default)]
    pub mode: ProviderMode,

    /// Model repository id on the Hugging Face Hub
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the hosted inference API (remote mode)
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Repository revision to download (local mode)
    #[serde(default = "default_revision")]
    pub revision: String,

    /// Inference device (local mode)
    #[serde(default)]
    pub device: DeviceSpec,

    /// Maximum number of tokens fed to the model (local mode)
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl ProviderSettings {
    /// Full URL of the hosted model endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), self.model)
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            mode: ProviderMode::default(),
            model: default_model(),
            api_base: default_api_base(),
            revision: default_revision(),
            device: DeviceSpec::default(),
            max_length: default_max_length(),
        }
    }
}

/// Device specification (for config files)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeviceSpec {
    #[default]
    Cpu,
    Cuda,
    Metal,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_revision() -> String {
    "main".to_string()
}

fn default_max_length() -> usize {
    512
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults_from_empty_yaml() {
        let settings: ProviderSettings = serde_yaml::from_str("{}").unwrap();

        assert_eq!(settings.mode, ProviderMode::Local);
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.revision, "main");
        assert_eq!(settings.device, DeviceSpec::Cpu);
        assert_eq!(settings.max_length, 512);
    }

    #[test]
    fn test_settings_remote_yaml() {
        let yaml = r#"
mode: remote
model: unitary/toxic-bert
api_base: http://localhost:9000/models/
"#;

        let settings: ProviderSettings = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(settings.mode, ProviderMode::Remote);
        assert_eq!(
            settings.endpoint(),
            "http://localhost:9000/models/unitary/toxic-bert"
        );
    }

    #[test]
    fn test_default_endpoint() {
        let settings = ProviderSettings::default();
        assert_eq!(
            settings.endpoint(),
            "https://api-inference.huggingface.co/models/MagnusFelintoMV/ClassificacaoEmail"
        );
    }

    #[test]
    fn test_provider_mode_parse() {
        assert_eq!("remote".parse::<ProviderMode>().unwrap(), ProviderMode::Remote);
        assert_eq!("LOCAL".parse::<ProviderMode>().unwrap(), ProviderMode::Local);
        assert!("gpu".parse::<ProviderMode>().is_err());
    }

    #[test]
    fn test_device_spec() {
        let device: DeviceSpec = serde_yaml::from_str("cuda").unwrap();
        assert_eq!(device, DeviceSpec::Cuda);
    }
}
