//! Configuration file loading for the command-line host.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::NodeError;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// API key configuration.
    #[serde(default)]
    pub keys: KeysConfig,

    /// Default input values, used when a flag is not given.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Remote endpoint settings.
    #[serde(default)]
    pub network: NetworkConfig,
}

/// API key configuration.
#[derive(Debug, Default, Deserialize)]
pub struct KeysConfig {
    /// Gemini API key.
    pub gemini: Option<String>,
}

/// Default input values from the config file.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Default model name.
    pub model: String,
    /// Default aspect ratio.
    pub aspect_ratio: String,
    /// Default number of images.
    pub count: u32,
    /// Default output format.
    pub format: String,
    /// Default proxy; empty means direct.
    pub proxy_url: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash-image".to_string(),
            aspect_ratio: "1:1".to_string(),
            count: 1,
            format: "png".to_string(),
            proxy_url: String::new(),
        }
    }
}

/// Remote endpoint settings.
#[derive(Debug, Default, Deserialize)]
pub struct NetworkConfig {
    /// Override for the API base URL.
    pub base_url: Option<String>,
    /// Timeout for direct (non-proxied) requests, in seconds.
    pub timeout_secs: Option<u64>,
}

impl NetworkConfig {
    /// Direct-connection timeout, if configured.
    #[must_use]
    pub fn direct_timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, NodeError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| {
            NodeError::Configuration(format!("Failed to read config {}: {e}", path.display()))
        })?;
        toml::from_str(&contents).map_err(|e| {
            NodeError::Configuration(format!("Failed to parse config {}: {e}", path.display()))
        })
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `SIMPLE_GEMINI_CONFIG` environment variable
/// 3. `~/.config/simple-gemini/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("SIMPLE_GEMINI_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/simple-gemini/config.toml")
    } else {
        PathBuf::from("simple-gemini.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.keys.gemini.is_none());
        assert_eq!(config.defaults.model, "gemini-2.5-flash-image");
        assert_eq!(config.defaults.aspect_ratio, "1:1");
        assert_eq!(config.defaults.count, 1);
        assert_eq!(config.defaults.format, "png");
        assert!(config.defaults.proxy_url.is_empty());
        assert!(config.network.direct_timeout().is_none());
    }

    #[test]
    fn load_nonexistent_returns_defaults() {
        let config = Config::load(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(config.defaults.model, "gemini-2.5-flash-image");
    }

    #[test]
    fn load_valid_toml() {
        let dir = std::env::temp_dir().join("simple_gemini_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            r#"
[keys]
gemini = "test-gemini-key"

[defaults]
model = "imagen-4.0-generate-001"
aspect_ratio = "16:9"
count = 3
proxy_url = "http://127.0.0.1:7890"

[network]
base_url = "http://localhost:8080/v1beta"
timeout_secs = 30
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.keys.gemini.as_deref(), Some("test-gemini-key"));
        assert_eq!(config.defaults.model, "imagen-4.0-generate-001");
        assert_eq!(config.defaults.aspect_ratio, "16:9");
        assert_eq!(config.defaults.count, 3);
        // Unset fields keep their defaults.
        assert_eq!(config.defaults.format, "png");
        assert_eq!(config.defaults.proxy_url, "http://127.0.0.1:7890");
        assert_eq!(config.network.base_url.as_deref(), Some("http://localhost:8080/v1beta"));
        assert_eq!(config.network.direct_timeout(), Some(Duration::from_secs(30)));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_invalid_toml() {
        let dir = std::env::temp_dir().join("simple_gemini_config_bad_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").unwrap();

        assert!(matches!(Config::load(&path), Err(NodeError::Configuration(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn discover_explicit_path() {
        let path = discover_config_path(Some("/tmp/my-config.toml"));
        assert_eq!(path, PathBuf::from("/tmp/my-config.toml"));
    }
}
