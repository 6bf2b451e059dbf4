//! Configuration file loading with environment variable overrides.
//!
//! Read once at startup; the resulting values are baked into the service
//! context and never mutated afterwards.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Backend selection.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// API key configuration.
    #[serde(default)]
    pub keys: KeysConfig,

    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Endpoint URL overrides (mainly for tests and regional endpoints).
    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

/// Backend selection configuration.
#[derive(Debug, Default, Deserialize)]
pub struct ProviderConfig {
    /// Backend name: `"gemini"` or `"qwen"`.
    pub backend: Option<String>,
}

/// API key configuration.
#[derive(Debug, Default, Deserialize)]
pub struct KeysConfig {
    /// Gemini API key.
    pub gemini: Option<String>,
    /// Qwen `DashScope` API key.
    pub qwen: Option<String>,
}

/// HTTP server configuration.
#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. `0.0.0.0:8080`.
    pub bind: Option<String>,
}

/// Endpoint URL overrides.
#[derive(Debug, Default, Deserialize)]
pub struct EndpointsConfig {
    /// Gemini API base URL override.
    pub gemini: Option<String>,
    /// Qwen API base URL override.
    pub qwen: Option<String>,
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Get the backend name, preferring the environment variable.
    /// Defaults to `qwen`.
    #[must_use]
    pub fn backend(&self) -> String {
        std::env::var("BOARDGEN_BACKEND")
            .ok()
            .or_else(|| self.provider.backend.clone())
            .unwrap_or_else(|| "qwen".to_string())
    }

    /// Get the Gemini API key, preferring the environment variable.
    #[must_use]
    pub fn gemini_key(&self) -> Option<String> {
        std::env::var("GEMINI_API_KEY").ok().or_else(|| self.keys.gemini.clone())
    }

    /// Get the Qwen API key, preferring the environment variable.
    #[must_use]
    pub fn qwen_key(&self) -> Option<String> {
        std::env::var("QWEN_API_KEY").ok().or_else(|| self.keys.qwen.clone())
    }

    /// Get the bind address. Defaults to `0.0.0.0:8080`.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        std::env::var("BOARDGEN_BIND")
            .ok()
            .or_else(|| self.server.bind.clone())
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
    }

    /// Get the Gemini endpoint base override, preferring the environment
    /// variable.
    #[must_use]
    pub fn gemini_base(&self) -> Option<String> {
        std::env::var("GEMINI_API_BASE").ok().or_else(|| self.endpoints.gemini.clone())
    }

    /// Get the Qwen endpoint base override, preferring the environment
    /// variable.
    #[must_use]
    pub fn qwen_base(&self) -> Option<String> {
        std::env::var("QWEN_API_BASE").ok().or_else(|| self.endpoints.qwen.clone())
    }
}

/// Discover the config file path using the resolution order:
/// 1. `BOARDGEN_CONFIG` environment variable
/// 2. `~/.config/boardgen/config.toml`
#[must_use]
pub fn discover_config_path() -> PathBuf {
    if let Ok(p) = std::env::var("BOARDGEN_CONFIG") {
        return PathBuf::from(p);
    }
    default_config_path()
}

/// Default config path: `~/.config/boardgen/config.toml`.
fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/boardgen/config.toml")
    } else {
        PathBuf::from("boardgen.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.keys.gemini.is_none());
        assert!(config.keys.qwen.is_none());
        assert!(config.provider.backend.is_none());
        assert!(config.server.bind.is_none());
    }

    #[test]
    fn load_nonexistent_returns_defaults() {
        let config = Config::load(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert!(config.keys.qwen.is_none());
    }

    #[test]
    fn load_valid_toml() {
        let dir = std::env::temp_dir().join("boardgen_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            r#"
[provider]
backend = "gemini"

[keys]
gemini = "test-gemini-key"
qwen = "test-qwen-key"

[server]
bind = "127.0.0.1:9000"

[endpoints]
qwen = "http://localhost:4010"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.provider.backend.as_deref(), Some("gemini"));
        assert_eq!(config.keys.gemini.as_deref(), Some("test-gemini-key"));
        assert_eq!(config.keys.qwen.as_deref(), Some("test-qwen-key"));
        assert_eq!(config.server.bind.as_deref(), Some("127.0.0.1:9000"));
        assert_eq!(config.endpoints.qwen.as_deref(), Some("http://localhost:4010"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_invalid_toml() {
        let dir = std::env::temp_dir().join("boardgen_config_bad_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").unwrap();

        assert!(Config::load(&path).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
