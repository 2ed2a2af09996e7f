use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::exchange::binance::BINANCE_API_URL;

pub const API_KEY_ENV: &str = "BINANCE_API_KEY";
pub const API_SECRET_ENV: &str = "BINANCE_API_SECRET";

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: Api,
    pub log: Log,
}

impl Settings {
    /// Layers defaults, `config/{RUN_MODE}`, an optional explicit file and
    /// `BINANCE__*` environment overrides, in that order.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        layered(config_file)?.try_deserialize()
    }
}

fn layered(config_file: Option<&Path>) -> Result<Config, ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    let mut builder = Config::builder()
        .set_default("api.base_url", BINANCE_API_URL)?
        .set_default("api.timeout_secs", 30)?
        .set_default("log.level", "info")?
        .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

    if let Some(path) = config_file {
        builder = builder.add_source(File::from(path).required(true));
    }

    // BINANCE__API__BASE_URL -> api.base_url. The single-underscore
    // credential variables never match this prefix.
    builder = builder.add_source(
        Environment::with_prefix("BINANCE")
            .prefix_separator("__")
            .separator("__"),
    );

    builder.build()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: Api {
                base_url: BINANCE_API_URL.to_string(),
                timeout_secs: 30,
            },
            log: Log {
                level: "info".to_string(),
            },
        }
    }
}

/// API key and secret. Either may be absent, which restricts the client to
/// unauthenticated, unsigned requests.
#[derive(Default)]
pub struct Credentials {
    api_key: Option<String>,
    api_secret: Option<SecretString>,
}

impl Credentials {
    /// Empty strings count as absent.
    pub fn new(api_key: Option<String>, api_secret: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            api_secret: api_secret
                .filter(|s| !s.is_empty())
                .map(SecretString::from),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Read `BINANCE_API_KEY` and `BINANCE_API_SECRET`. The binary loads
    /// `.env` before calling this.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var(API_KEY_ENV).ok(),
            std::env::var(API_SECRET_ENV).ok(),
        )
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Only for signing. Never log the returned value.
    pub fn expose_secret(&self) -> Option<&str> {
        self.api_secret.as_ref().map(|s| s.expose_secret())
    }

    pub fn has_secret(&self) -> bool {
        self.api_secret.is_some()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field(
                "api_secret",
                &self.api_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_credentials_are_absent() {
        let creds = Credentials::new(Some(String::new()), Some(String::new()));
        assert!(creds.api_key().is_none());
        assert!(!creds.has_secret());
    }

    #[test]
    fn test_credentials_expose_values() {
        let creds = Credentials::new(Some("key".into()), Some("secret".into()));
        assert_eq!(creds.api_key(), Some("key"));
        assert_eq!(creds.expose_secret(), Some("secret"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new(Some("my_api_key".into()), Some("super_secret".into()));
        let debug_str = format!("{:?}", creds);

        assert!(debug_str.contains("my_api_key"));
        assert!(!debug_str.contains("super_secret"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.api.base_url, "https://api.binance.com");
        assert_eq!(settings.api.timeout_secs, 30);
        assert_eq!(settings.log.level, "info");
    }

    #[test]
    fn test_load_without_files_uses_defaults() {
        let settings = Settings::load(None).unwrap();
        assert!(!settings.api.base_url.is_empty());
        assert!(settings.api.timeout_secs > 0);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let path = std::env::temp_dir().join("binance-core-does-not-exist.toml");
        assert!(Settings::load(Some(&path)).is_err());
    }

    // Env mutation stays inside this one test so parallel tests never see a
    // half-applied environment.
    #[test]
    fn test_file_then_env_layering() {
        let path = std::env::temp_dir().join(format!(
            "binance-core-settings-{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[api]\nbase_url = \"https://testnet.binance.vision\"\ntimeout_secs = 12\n\n[log]\nlevel = \"warn\"\n",
        )
        .unwrap();

        let from_file = Settings::load(Some(&path));

        std::env::set_var("BINANCE__API__TIMEOUT_SECS", "7");
        std::env::set_var(API_KEY_ENV, "key-from-env");
        let overridden = Settings::load(Some(&path));
        let raw = layered(Some(&path));
        std::env::remove_var("BINANCE__API__TIMEOUT_SECS");
        std::env::remove_var(API_KEY_ENV);
        std::fs::remove_file(&path).ok();

        let from_file = from_file.unwrap();
        assert_eq!(from_file.api.base_url, "https://testnet.binance.vision");
        assert_eq!(from_file.api.timeout_secs, 12);
        assert_eq!(from_file.log.level, "warn");

        let overridden = overridden.unwrap();
        assert_eq!(overridden.api.timeout_secs, 7);
        assert_eq!(overridden.api.base_url, "https://testnet.binance.vision");
        assert_eq!(overridden.log.level, "warn");

        let raw: serde_json::Map<String, serde_json::Value> = raw.unwrap().try_deserialize().unwrap();
        let mut keys: Vec<&str> = raw.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["api", "log"]);
    }
}
