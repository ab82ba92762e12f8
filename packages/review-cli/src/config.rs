use anyhow::{Context, Result};
use dotenvy::dotenv;
use secrecy::SecretString;
use std::env;
use std::num::NonZeroU32;

const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";
const DEFAULT_MODEL: &str = "gemma3";

/// Model-serving configuration loaded from environment variables
#[derive(Debug)]
pub struct Config {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<SecretString>,
    pub concurrency: usize,
    pub requests_per_second: Option<NonZeroU32>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            base_url: lookup("MODEL_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: lookup("MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key: lookup("MODEL_API_KEY")
                .filter(|key| !key.is_empty())
                .map(SecretString::from),
            concurrency: lookup("MODEL_CONCURRENCY")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("MODEL_CONCURRENCY must be a positive number")?
                .unwrap_or(1),
            requests_per_second: lookup("MODEL_REQUESTS_PER_SECOND")
                .map(|v| v.parse::<NonZeroU32>())
                .transpose()
                .context("MODEL_REQUESTS_PER_SECOND must be a positive number")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.api_key.is_none());
        assert_eq!(config.concurrency, 1);
        assert!(config.requests_per_second.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("MODEL_BASE_URL", "https://api.example.com/v1"),
            ("MODEL_NAME", "gpt-4o-mini"),
            ("MODEL_API_KEY", "sk-test"),
            ("MODEL_CONCURRENCY", "4"),
            ("MODEL_REQUESTS_PER_SECOND", "2"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://api.example.com/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert!(config.api_key.is_some());
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.requests_per_second, NonZeroU32::new(2));
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(Config::from_lookup(lookup(&[("MODEL_CONCURRENCY", "many")])).is_err());
        assert!(Config::from_lookup(lookup(&[("MODEL_REQUESTS_PER_SECOND", "0")])).is_err());
    }

    #[test]
    fn test_empty_api_key_is_none() {
        let config = Config::from_lookup(lookup(&[("MODEL_API_KEY", "")])).unwrap();
        assert!(config.api_key.is_none());
    }
}
