//! In-memory data source backed by fixtures
//!
//! Used for offline replay of captured indexer data and for tests. A fixture
//! file is a JSON object keyed by address:
//!
//! ```json
//! {
//!   "ADDRESS": {
//!     "balance": 12.5,
//!     "transactions": [ { "tx-type": "pay", "round-time": 1700000000, ... } ],
//!     "assets": { "31566704": 5000000 }
//!   }
//! }
//! ```

use super::{AccountBalance, AccountDataSource};
use crate::error::FetchError;
use crate::scoring::RawTransaction;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountFixture {
    /// ALGO
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub transactions: Vec<RawTransaction>,
    /// Asset id -> base units
    #[serde(default)]
    pub assets: BTreeMap<u64, u64>,
}

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    accounts: HashMap<String, AccountFixture>,
    failures: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, address: impl Into<String>, fixture: AccountFixture) -> Self {
        self.accounts.insert(address.into(), fixture);
        self
    }

    /// Make every fetch for `address` fail with the given reason
    pub fn with_failure(mut self, address: impl Into<String>, reason: impl Into<String>) -> Self {
        self.failures.insert(address.into(), reason.into());
        self
    }

    /// Load fixtures from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, FetchError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| FetchError::Decode(format!("{}: {}", path.display(), e)))?;
        let accounts: HashMap<String, AccountFixture> =
            serde_json::from_str(&json).map_err(|e| FetchError::Decode(e.to_string()))?;

        log::info!("Loaded {} account fixtures from {}", accounts.len(), path.display());

        Ok(Self {
            accounts,
            failures: HashMap::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn lookup(&self, address: &str) -> Result<&AccountFixture, FetchError> {
        if let Some(reason) = self.failures.get(address) {
            return Err(FetchError::Unavailable(reason.clone()));
        }
        self.accounts
            .get(address)
            .ok_or_else(|| FetchError::NotFound(address.to_string()))
    }
}

#[async_trait]
impl AccountDataSource for MemorySource {
    async fn fetch_account_balance(&self, address: &str) -> Result<AccountBalance, FetchError> {
        let fixture = self.lookup(address)?;
        Ok(AccountBalance {
            algo_balance: fixture.balance,
            min_balance: None,
            status: None,
        })
    }

    async fn fetch_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<RawTransaction>, FetchError> {
        let fixture = self.lookup(address)?;
        Ok(fixture.transactions.iter().take(limit).cloned().collect())
    }

    async fn fetch_asa_holdings(&self, address: &str) -> Result<BTreeMap<u64, u64>, FetchError> {
        Ok(self.lookup(address)?.assets.clone())
    }
}
