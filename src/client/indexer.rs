//! Algorand algod + indexer HTTP client
//!
//! ## API Reference
//!
//! - algod `GET /v2/accounts/{address}` → account info, `amount` in microalgos
//! - indexer `GET /v2/accounts/{address}/transactions?limit=N` → `transactions`
//! - indexer `GET /v2/accounts/{address}/assets` → `assets`
//!
//! Every request carries the `X-API-Key` header, honors the client-side rate
//! limit, and retries rate-limit (429), server (5xx) and transport errors with
//! exponential backoff. Only the first page of results is read.

use super::backoff::RetryBackoff;
use super::config::{ClientConfig, Network};
use super::{AccountBalance, AccountDataSource};
use crate::error::FetchError;
use crate::scoring::RawTransaction;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Instant;
use tokio::sync::Mutex;

pub const MAX_TRANSACTION_LIMIT: usize = 10_000;

const MICROALGOS_PER_ALGO: f64 = 1e6;

#[derive(Debug, Deserialize)]
struct AccountInfo {
    #[serde(default)]
    amount: u64,
    #[serde(default, rename = "min-balance")]
    min_balance: Option<u64>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TransactionsPage {
    /// Decoded record by record so one malformed entry cannot sink the page
    #[serde(default)]
    transactions: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct AssetHolding {
    #[serde(default)]
    amount: u64,
    #[serde(rename = "asset-id")]
    asset_id: u64,
}

#[derive(Debug, Deserialize)]
struct AssetsPage {
    #[serde(default)]
    assets: Vec<AssetHolding>,
}

/// Decode each record on its own
///
/// A record that does not fit `RawTransaction` is kept as an untyped
/// placeholder, which the classifier drops and counts as ignored.
fn decode_transactions(values: Vec<serde_json::Value>) -> Vec<RawTransaction> {
    values
        .into_iter()
        .map(|value| {
            let id = value.get("id").and_then(|v| v.as_str()).map(str::to_string);
            serde_json::from_value::<RawTransaction>(value).unwrap_or_else(|e| {
                log::debug!(
                    "Malformed transaction {}: {}",
                    id.as_deref().unwrap_or("<no id>"),
                    e
                );
                RawTransaction {
                    id,
                    ..Default::default()
                }
            })
        })
        .collect()
}

/// Asset id -> total amount, duplicate rows summed without overflow
fn sum_holdings(assets: Vec<AssetHolding>) -> BTreeMap<u64, u64> {
    let mut holdings = BTreeMap::new();
    for asset in assets {
        let total = holdings.entry(asset.asset_id).or_insert(0u64);
        *total = total.saturating_add(asset.amount);
    }
    holdings
}

/// Trim, upper-case and check the shape of an Algorand address
///
/// Only the 58-character base32 shape is checked, not the checksum.
pub fn normalize_address(address: &str) -> Result<String, FetchError> {
    let normalized = address.trim().to_uppercase();

    let valid_shape = normalized.len() == 58
        && normalized
            .chars()
            .all(|c| c.is_ascii_uppercase() || ('2'..='7').contains(&c));

    if valid_shape {
        Ok(normalized)
    } else {
        Err(FetchError::InvalidAddress(address.to_string()))
    }
}

/// Limits at or below zero become 1, large limits are clamped
pub fn clamp_limit(limit: usize) -> usize {
    limit.clamp(1, MAX_TRANSACTION_LIMIT)
}

pub struct IndexerClient {
    http: reqwest::Client,
    config: ClientConfig,
    last_call: Mutex<Option<Instant>>,
}

impl IndexerClient {
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        log::info!(
            "🔌 Algorand client ready (network: {}, indexer: {})",
            config.network.as_str(),
            config.indexer_url
        );

        Ok(Self {
            http,
            config,
            last_call: Mutex::new(None),
        })
    }

    pub fn network(&self) -> Network {
        self.config.network
    }

    /// Sleep just enough to honor the configured rate limit
    async fn throttle(&self) {
        let Some(min_interval) = self.config.min_interval() else {
            return;
        };

        let mut last_call = self.last_call.lock().await;
        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < min_interval {
                let wait = min_interval - elapsed;
                log::debug!("throttle: sleeping {:.3}s", wait.as_secs_f64());
                tokio::time::sleep(wait).await;
            }
        }
        *last_call = Some(Instant::now());
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let response = self
            .http
            .get(url)
            .header("X-API-Key", &self.config.api_token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let mut backoff = RetryBackoff::new(
            self.config.backoff_factor,
            self.config.max_retries,
            self.config.enable_jitter,
        );

        loop {
            self.throttle().await;
            match self.get_once(url, query).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() => {
                    log::warn!("⚠️  Request to {} failed: {}", url, e);
                    if backoff.sleep().await.is_err() {
                        return Err(e);
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl AccountDataSource for IndexerClient {
    async fn fetch_account_balance(&self, address: &str) -> Result<AccountBalance, FetchError> {
        let address = normalize_address(address)?;
        let url = format!("{}/v2/accounts/{}", self.config.algod_url, address);

        let info: AccountInfo = self.get_json(&url, &[]).await?;

        Ok(AccountBalance {
            algo_balance: info.amount as f64 / MICROALGOS_PER_ALGO,
            min_balance: info.min_balance.map(|m| m as f64 / MICROALGOS_PER_ALGO),
            status: info.status,
        })
    }

    async fn fetch_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<RawTransaction>, FetchError> {
        let address = normalize_address(address)?;
        let limit = clamp_limit(limit);
        let url = format!(
            "{}/v2/accounts/{}/transactions",
            self.config.indexer_url, address
        );

        let page: TransactionsPage = self
            .get_json(&url, &[("limit", limit.to_string())])
            .await?;

        let mut transactions = decode_transactions(page.transactions);
        transactions.truncate(limit);
        log::debug!("Fetched {} transactions for {}", transactions.len(), address);
        Ok(transactions)
    }

    async fn fetch_asa_holdings(&self, address: &str) -> Result<BTreeMap<u64, u64>, FetchError> {
        let address = normalize_address(address)?;
        let url = format!("{}/v2/accounts/{}/assets", self.config.indexer_url, address);

        let page: AssetsPage = self.get_json(&url, &[]).await?;

        Ok(sum_holdings(page.assets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_address() {
        let valid = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaay5hfkq";
        assert_eq!(
            normalize_address(&format!("  {}\n", valid)).unwrap(),
            valid.to_uppercase()
        );

        assert!(normalize_address("").is_err());
        assert!(normalize_address("SHORT").is_err());
        // '1' and '0' are not in the base32 alphabet
        assert!(normalize_address(&"A1".repeat(29)).is_err());
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(250), 250);
        assert_eq!(clamp_limit(50_000), MAX_TRANSACTION_LIMIT);
    }

    #[test]
    fn test_parse_assets_page() {
        let body = r#"{"assets":[{"amount":5000000,"asset-id":31566704,"is-frozen":false},{"amount":1,"asset-id":31566704}],"current-round":1}"#;
        let page: AssetsPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.assets.len(), 2);
        assert_eq!(page.assets[0].asset_id, 31566704);
    }

    #[test]
    fn test_holdings_sum_saturates() {
        let assets = vec![
            AssetHolding {
                amount: u64::MAX - 1,
                asset_id: 7,
            },
            AssetHolding {
                amount: 10,
                asset_id: 7,
            },
            AssetHolding {
                amount: 3,
                asset_id: 9,
            },
        ];

        let holdings = sum_holdings(assets);
        assert_eq!(holdings.get(&7), Some(&u64::MAX));
        assert_eq!(holdings.get(&9), Some(&3));
    }

    #[test]
    fn test_malformed_record_does_not_sink_page() {
        let body = r#"{"transactions":[
            {"id":"GOOD","tx-type":"pay","round-time":1700000000},
            {"id":"BAD","tx-type":"pay","round-time":1700000000.5}
        ]}"#;
        let page: TransactionsPage = serde_json::from_str(body).unwrap();

        let transactions = decode_transactions(page.transactions);
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].round_time, Some(1_700_000_000));
        assert_eq!(transactions[1].id.as_deref(), Some("BAD"));
        assert_eq!(transactions[1].tx_type, None);
    }
}
