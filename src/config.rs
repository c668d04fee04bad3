use serde::{Deserialize, Serialize};

use crate::error::*;

/// Frontend configuration, deserialized from `config.toml`.
///
/// Every field has a default so a partial (or absent) file still yields a
/// usable config.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_api_server")]
    pub api_server: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_image_providers")]
    pub image_providers: Vec<String>,
    /// Artificial round-trip latency of the in-memory repository, in
    /// milliseconds. Only applied on wasm targets.
    #[serde(default = "default_mock_latency_ms")]
    pub mock_latency_ms: u32,
}

fn default_api_server() -> String {
    "http://0.0.0.0:8081".to_owned()
}

fn default_page_size() -> u32 {
    20
}

fn default_image_providers() -> Vec<String> {
    vec!["https://i.imgur.com".to_owned()]
}

fn default_mock_latency_ms() -> u32 {
    200
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_server: default_api_server(),
            page_size: default_page_size(),
            image_providers: default_image_providers(),
            mock_latency_ms: default_mock_latency_ms(),
        }
    }
}

impl Config {
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw)
            .map_err(|err| Error::new(ErrorKind::Internal, err.to_string()))
            .context("malformed config file")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_when_empty() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config =
            Config::from_toml("api_server = \"https://api.example.org\"")
                .unwrap();
        assert_eq!(config.api_server, "https://api.example.org");
        assert_eq!(config.page_size, default_page_size());
    }

    #[test]
    fn malformed_file() {
        let err = Config::from_toml("api_server = [").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
    }
}
