//! Server configuration

use crate::cli::Cli;
use anyhow::Context;
use labelgate_classifiers::ProviderSettings;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Classification provider
    #[serde(default)]
    pub provider: ProviderSettings,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read {}", config_path))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", config_path))?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(listen) = &cli.listen {
            config.listen = listen.clone();
        }

        if let Some(port) = cli.port {
            config.port = port;
        }

        if let Some(mode) = cli.mode {
            config.provider.mode = mode;
        }

        if let Some(model) = &cli.model {
            config.provider.model = model.clone();
        }

        if let Some(api_base) = &cli.api_base {
            config.provider.api_base = api_base.clone();
        }

        Ok(config)
    }

    /// Address the listener binds to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.listen, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.listen, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            provider: ProviderSettings::default(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelgate_classifiers::{DeviceSpec, ProviderMode};
    use std::io::Write;

    fn write_config(yaml: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let cli = Cli::default();
        let config = ServerConfig::load("/nonexistent/labelgate.yaml", &cli).unwrap();

        assert_eq!(config.port, 8000);
        assert_eq!(config.listen, "0.0.0.0");
        assert_eq!(config.provider.mode, ProviderMode::Local);
        assert_eq!(config.socket_addr().unwrap().port(), 8000);
    }

    #[test]
    fn test_yaml_file() {
        let file = write_config(
            r#"
listen: 127.0.0.1
port: 9100
provider:
  mode: remote
  model: unitary/toxic-bert
  device: cuda
  max_length: 256
"#,
        );
        let path = file.path().to_str().unwrap();

        let config = ServerConfig::load(path, &Cli::default()).unwrap();

        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:9100");
        assert_eq!(config.provider.mode, ProviderMode::Remote);
        assert_eq!(config.provider.model, "unitary/toxic-bert");
        assert_eq!(config.provider.device, DeviceSpec::Cuda);
        assert_eq!(config.provider.max_length, 256);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = write_config("port: 9100\nprovider:\n  mode: local\n");
        let path = file.path().to_str().unwrap();

        let cli = Cli {
            port: Some(7000),
            mode: Some(ProviderMode::Remote),
            api_base: Some("http://127.0.0.1:9999/models".to_string()),
            ..Default::default()
        };

        let config = ServerConfig::load(path, &cli).unwrap();

        assert_eq!(config.port, 7000);
        assert_eq!(config.provider.mode, ProviderMode::Remote);
        assert_eq!(
            config.provider.endpoint(),
            "http://127.0.0.1:9999/models/MagnusFelintoMV/ClassificacaoEmail"
        );
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let file = write_config("port: not-a-number\n");
        let path = file.path().to_str().unwrap();

        assert!(ServerConfig::load(path, &Cli::default()).is_err());
    }

    #[test]
    fn test_invalid_listen_address() {
        let config = ServerConfig {
            listen: "not an address".to_string(),
            ..Default::default()
        };

        assert!(config.socket_addr().is_err());
    }
}
