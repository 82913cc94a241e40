//! Data-fetch boundary
//!
//! The scoring core never talks to the network. Everything it consumes comes
//! through [`AccountDataSource`], which reports failures as `Result` so the
//! batch aggregator can record them per address.

pub mod backoff;
pub mod config;
pub mod indexer;
pub mod memory;

pub use config::{ClientConfig, Network};
pub use indexer::IndexerClient;
pub use memory::{AccountFixture, MemorySource};

use crate::error::FetchError;
use crate::scoring::RawTransaction;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// ALGO, not microalgos
    pub algo_balance: f64,
    pub min_balance: Option<f64>,
    pub status: Option<String>,
}

/// Source of account data for the scorer
#[async_trait]
pub trait AccountDataSource: Send + Sync {
    async fn fetch_account_balance(&self, address: &str) -> Result<AccountBalance, FetchError>;

    /// Most recent transactions, at most `limit`
    async fn fetch_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<RawTransaction>, FetchError>;

    /// Asset id -> held amount in base units
    async fn fetch_asa_holdings(&self, address: &str) -> Result<BTreeMap<u64, u64>, FetchError>;
}
