//! Configuration management for the monitor.
//!
//! A TOML file covers everything; credentials may instead come from the
//! environment (`GITHUB_TOKEN`, `NEWS_API_KEY`, `OPENWEATHER_API_KEY`), which
//! wins only when the file leaves them unset.

use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

/// Main configuration structure for the monitor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General application settings
    pub app: AppConfig,
    /// Refresh scheduling settings
    pub refresh: RefreshConfig,
    /// Per-source endpoints and credentials
    pub sources: SourcesConfig,
}

/// Application-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Log level (debug, info, warn, error)
    pub log_level: String,
    /// Bind host for the snapshot API
    pub host: String,
    /// Bind port for the snapshot API
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { log_level: "info".to_string(), host: "127.0.0.1".to_string(), port: 5000 }
    }
}

/// Refresh scheduling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Seconds between scheduled cycles
    pub interval_secs: u64,
    /// Per-request timeout bounding each collector's single attempt
    pub request_timeout_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { interval_secs: 300, request_timeout_secs: 10 }
    }
}

/// Endpoints and credentials for the five collectors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub github: GithubSourceConfig,
    pub market: MarketSourceConfig,
    pub news: NewsSourceConfig,
    pub geo: GeoSourceConfig,
    pub social: SocialSourceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubSourceConfig {
    pub endpoint: String,
    /// Optional bearer token; raises the unauthenticated rate limit
    pub token: Option<String>,
}

impl Default for GithubSourceConfig {
    fn default() -> Self {
        Self { endpoint: "https://api.github.com".to_string(), token: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSourceConfig {
    pub endpoint: String,
}

impl Default for MarketSourceConfig {
    fn default() -> Self {
        Self { endpoint: "https://api.coingecko.com".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsSourceConfig {
    pub endpoint: String,
    /// Required for live headlines; without it the news domain runs degraded
    pub api_key: Option<String>,
}

impl Default for NewsSourceConfig {
    fn default() -> Self {
        Self { endpoint: "https://newsapi.org".to_string(), api_key: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoSourceConfig {
    pub countries_endpoint: String,
    pub weather_endpoint: String,
    /// ISO alpha-2 codes of the monitored regions
    pub country_codes: Vec<String>,
    pub weather_api_key: Option<String>,
}

impl Default for GeoSourceConfig {
    fn default() -> Self {
        Self {
            countries_endpoint: "https://restcountries.com".to_string(),
            weather_endpoint: "https://api.openweathermap.org".to_string(),
            country_codes: vec!["us".to_string(), "de".to_string(), "in".to_string()],
            weather_api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialSourceConfig {
    pub endpoint: String,
}

impl Default for SocialSourceConfig {
    fn default() -> Self {
        Self { endpoint: "https://jsonplaceholder.typicode.com".to_string() }
    }
}

impl Config {
    /// Load configuration from a TOML file, filling unset credentials from
    /// the environment.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&raw)?;
        config.hydrate_credentials();
        Ok(config)
    }

    /// Save the configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let raw = toml::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }

    /// Default configuration rendered as TOML (for `devflow init`)
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Config::default()).expect("default config serializes")
    }

    /// Fill credentials left unset in the file from the environment.
    pub fn hydrate_credentials(&mut self) {
        if self.sources.github.token.is_none() {
            self.sources.github.token = env_credential("GITHUB_TOKEN");
        }
        if self.sources.news.api_key.is_none() {
            self.sources.news.api_key = env_credential("NEWS_API_KEY");
        }
        if self.sources.geo.weather_api_key.is_none() {
            self.sources.geo.weather_api_key = env_credential("OPENWEATHER_API_KEY");
        }
    }
}

fn env_credential(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toml_round_trips() {
        let rendered = Config::default_toml();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.app.port, 5000);
        assert_eq!(parsed.refresh.interval_secs, 300);
        assert_eq!(parsed.sources.geo.country_codes, vec!["us", "de", "in"]);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            [refresh]
            interval_secs = 60

            [sources.github]
            endpoint = "https://github.example"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.refresh.interval_secs, 60);
        assert_eq!(parsed.refresh.request_timeout_secs, 10);
        assert_eq!(parsed.sources.github.endpoint, "https://github.example");
        assert_eq!(parsed.sources.market.endpoint, "https://api.coingecko.com");
        assert_eq!(parsed.app.log_level, "info");
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.app.port = 8123;
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.app.port, 8123);
        assert_eq!(loaded.sources.social.endpoint, config.sources.social.endpoint);
    }
}
