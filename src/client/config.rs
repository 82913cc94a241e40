//! Indexer / algod client configuration from environment variables

use crate::error::ConfigError;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    /// Unknown names fall back to testnet
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "mainnet" => Network::Mainnet,
            _ => Network::Testnet,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }

    pub fn algod_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://mainnet-api.4160.nodely.dev",
            Network::Testnet => "https://testnet-api.4160.nodely.dev",
        }
    }

    pub fn indexer_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://mainnet-idx.4160.nodely.dev",
            Network::Testnet => "https://testnet-idx.4160.nodely.dev",
        }
    }
}

/// Configuration for `IndexerClient`
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub network: Network,

    /// Sent as the `X-API-Key` header
    pub api_token: String,

    pub algod_url: String,
    pub indexer_url: String,

    /// Client-side request rate shared across all calls, unlimited when `None`
    pub rate_limit_per_sec: Option<f64>,

    pub max_retries: u32,

    /// First retry delay in seconds, doubled on every attempt
    pub backoff_factor: f64,

    pub enable_jitter: bool,

    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(network: Network, api_token: impl Into<String>) -> Self {
        Self {
            network,
            api_token: api_token.into(),
            algod_url: network.algod_url().to_string(),
            indexer_url: network.indexer_url().to_string(),
            rate_limit_per_sec: None,
            max_retries: 3,
            backoff_factor: 0.5,
            enable_jitter: false,
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Point both algod and indexer requests at one base URL (local nodes, tests)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.algod_url = url.clone();
        self.indexer_url = url;
        self
    }

    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `ALGOD_API_KEY` or `PURESTAKE_API_KEY` (required)
    /// - `ALGOREP_NETWORK` (default: testnet)
    /// - `ALGOREP_ALGOD_URL`, `ALGOREP_INDEXER_URL` (default: per network)
    /// - `ALGOREP_RATE_LIMIT_PER_SEC` (default: unlimited)
    /// - `ALGOREP_MAX_RETRIES` (default: 3)
    /// - `ALGOREP_BACKOFF_FACTOR` (default: 0.5)
    /// - `ALGOREP_RETRY_JITTER` (1/true/yes/on, default: off)
    /// - `ALGOREP_REQUEST_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup("ALGOD_API_KEY")
            .filter(|t| !t.trim().is_empty())
            .or_else(|| lookup("PURESTAKE_API_KEY").filter(|t| !t.trim().is_empty()))
            .ok_or_else(|| ConfigError::MissingVariable("ALGOD_API_KEY".to_string()))?;

        let network = lookup("ALGOREP_NETWORK")
            .map(|n| Network::from_name(&n))
            .unwrap_or(Network::Testnet);

        let mut config = Self::new(network, token.trim());

        if let Some(url) = lookup("ALGOREP_ALGOD_URL") {
            config.algod_url = url;
        }
        if let Some(url) = lookup("ALGOREP_INDEXER_URL") {
            config.indexer_url = url;
        }

        let parse = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let parse_err = |var: &str, value: &str| ConfigError::Parse {
            var: var.to_string(),
            value: value.to_string(),
        };

        if let Some(v) = parse("ALGOREP_RATE_LIMIT_PER_SEC") {
            let rate: f64 = v.parse().map_err(|_| parse_err("ALGOREP_RATE_LIMIT_PER_SEC", &v))?;
            config.rate_limit_per_sec = (rate > 0.0).then_some(rate);
        }
        if let Some(v) = parse("ALGOREP_MAX_RETRIES") {
            config.max_retries = v.parse().map_err(|_| parse_err("ALGOREP_MAX_RETRIES", &v))?;
        }
        if let Some(v) = parse("ALGOREP_BACKOFF_FACTOR") {
            let factor: f64 = v.parse().map_err(|_| parse_err("ALGOREP_BACKOFF_FACTOR", &v))?;
            config.backoff_factor = factor.max(0.0);
        }
        if let Some(v) = parse("ALGOREP_RETRY_JITTER") {
            config.enable_jitter = matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        if let Some(v) = parse("ALGOREP_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = v
                .parse()
                .map_err(|_| parse_err("ALGOREP_REQUEST_TIMEOUT_SECS", &v))?;
            config.request_timeout = Duration::from_secs(secs.max(1));
        }

        Ok(config)
    }

    /// Minimum spacing between requests implied by the rate limit
    pub fn min_interval(&self) -> Option<Duration> {
        self.rate_limit_per_sec
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .map(|rate| Duration::from_secs_f64(1.0 / rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::from_lookup(lookup_from(&[("ALGOD_API_KEY", "token")])).unwrap();

        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.api_token, "token");
        assert_eq!(config.indexer_url, "https://testnet-idx.4160.nodely.dev");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.backoff_factor, 0.5);
        assert!(!config.enable_jitter);
        assert_eq!(config.min_interval(), None);
    }

    #[test]
    fn test_custom_config() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("PURESTAKE_API_KEY", "fallback"),
            ("ALGOREP_NETWORK", " MainNet "),
            ("ALGOREP_RATE_LIMIT_PER_SEC", "4"),
            ("ALGOREP_MAX_RETRIES", "5"),
            ("ALGOREP_RETRY_JITTER", "yes"),
        ]))
        .unwrap();

        assert_eq!(config.api_token, "fallback");
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.algod_url, "https://mainnet-api.4160.nodely.dev");
        assert_eq!(config.min_interval(), Some(Duration::from_millis(250)));
        assert_eq!(config.max_retries, 5);
        assert!(config.enable_jitter);
    }

    #[test]
    fn test_missing_token() {
        let err = ClientConfig::from_lookup(lookup_from(&[("ALGOD_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVariable(_)));
    }

    #[test]
    fn test_unknown_network_falls_back() {
        assert_eq!(Network::from_name("betanet"), Network::Testnet);
    }

    #[test]
    fn test_bad_number_rejected() {
        let err = ClientConfig::from_lookup(lookup_from(&[
            ("ALGOD_API_KEY", "token"),
            ("ALGOREP_MAX_RETRIES", "many"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
