//! Batch scoring over many addresses
//!
//! Each address runs the full fetch → classify → score pipeline in its own
//! tokio task. A semaphore bounds how many run at once, and a per-address
//! timeout bounds how long any one of them can take. Results are keyed by
//! address, so completion order never matters and one failing address never
//! touches another's outcome.

use super::ranking::{AccountOutcome, BatchResult, Comparison};
use crate::client::AccountDataSource;
use crate::config::ReputationConfig;
use crate::scoring::{build_snapshot, score_detailed, ScoreBreakdown};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Addresses processed concurrently
    pub max_concurrency: usize,

    /// Upper bound on fetch + scoring time for one address
    pub per_address_timeout: Duration,

    /// Transactions requested per address
    pub transaction_limit: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            per_address_timeout: Duration::from_secs(30),
            transaction_limit: 1000,
        }
    }
}

/// Score one address, degrading fetch failures to "no activity"
///
/// Unlike the batch path this never fails: an unreachable indexer yields
/// the same low score as an idle account.
pub async fn score_address<D: AccountDataSource + ?Sized>(
    source: &D,
    address: &str,
    config: &ReputationConfig,
    limit: usize,
    now: i64,
) -> ScoreBreakdown {
    let transactions = source
        .fetch_transactions(address, limit)
        .await
        .unwrap_or_else(|e| {
            log::warn!("Error fetching transactions for {}: {}", address, e);
            Vec::new()
        });

    let holdings = source.fetch_asa_holdings(address).await.unwrap_or_else(|e| {
        log::warn!("Error fetching ASA holdings for {}: {}", address, e);
        BTreeMap::new()
    });

    score_detailed(&build_snapshot(address, &transactions, &holdings, now), config)
}

async fn fetch_and_score<D: AccountDataSource + ?Sized>(
    source: &D,
    address: &str,
    config: &ReputationConfig,
    limit: usize,
    now: i64,
) -> Result<ScoreBreakdown, String> {
    let transactions = source
        .fetch_transactions(address, limit)
        .await
        .map_err(|e| format!("transaction fetch failed: {}", e))?;

    let holdings = source
        .fetch_asa_holdings(address)
        .await
        .map_err(|e| format!("holdings fetch failed: {}", e))?;

    let snapshot = build_snapshot(address, &transactions, &holdings, now);

    if !transactions.is_empty() && snapshot.transactions.is_empty() {
        return Err(format!(
            "no classifiable transactions ({} ignored)",
            snapshot.ignored_transactions
        ));
    }

    Ok(score_detailed(&snapshot, config))
}

pub struct BatchScorer<D: ?Sized> {
    source: Arc<D>,
    config: Arc<ReputationConfig>,
    options: BatchOptions,
}

impl<D: AccountDataSource + ?Sized + 'static> BatchScorer<D> {
    pub fn new(source: Arc<D>, config: Arc<ReputationConfig>) -> Self {
        Self {
            source,
            config,
            options: BatchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn config(&self) -> &ReputationConfig {
        &self.config
    }

    /// Score every distinct address against the current time
    pub async fn score_batch(&self, addresses: &[String]) -> BatchResult {
        self.score_batch_at(addresses, chrono::Utc::now().timestamp())
            .await
    }

    /// Score every distinct address against a fixed reference time
    pub async fn score_batch_at(&self, addresses: &[String], now: i64) -> BatchResult {
        let mut results = BatchResult::new();
        let mut unique: BTreeSet<String> = BTreeSet::new();

        for raw in addresses {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                log::warn!("⚠️  Rejecting empty address {:?}", raw);
                results.insert(
                    raw.clone(),
                    AccountOutcome::Failed {
                        reason: "empty address".to_string(),
                    },
                );
            } else {
                unique.insert(trimmed.to_string());
            }
        }

        log::info!(
            "📊 Scoring {} addresses (concurrency: {})",
            unique.len(),
            self.options.max_concurrency
        );

        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrency.max(1)));
        let mut handles = Vec::with_capacity(unique.len());

        for address in unique {
            let source = Arc::clone(&self.source);
            let config = Arc::clone(&self.config);
            let semaphore = Arc::clone(&semaphore);
            let timeout = self.options.per_address_timeout;
            let limit = self.options.transaction_limit;
            let task_address = address.clone();

            let handle = tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return AccountOutcome::Failed {
                        reason: "scheduler closed".to_string(),
                    };
                };

                let pipeline =
                    fetch_and_score(source.as_ref(), &task_address, &config, limit, now);

                match tokio::time::timeout(timeout, pipeline).await {
                    Ok(Ok(breakdown)) => AccountOutcome::Scored(breakdown),
                    Ok(Err(reason)) => AccountOutcome::Failed { reason },
                    Err(_) => AccountOutcome::Failed {
                        reason: format!("timed out after {}ms", timeout.as_millis()),
                    },
                }
            });

            handles.push((address, handle));
        }

        for (address, handle) in handles {
            let outcome = handle.await.unwrap_or_else(|e| AccountOutcome::Failed {
                reason: format!("scoring task failed: {}", e),
            });

            match &outcome {
                AccountOutcome::Scored(b) => {
                    log::debug!("✅ {} scored {:.2}", address, b.reputation_score)
                }
                AccountOutcome::Failed { reason } => {
                    log::warn!("⚠️  {} failed: {}", address, reason)
                }
            }

            results.insert(address, outcome);
        }

        results
    }

    /// Score, rank and summarize a set of addresses
    pub async fn compare_accounts(&self, addresses: &[String]) -> Comparison {
        let results = self.score_batch(addresses).await;
        // Duplicates collapse into one entry, so count what was actually scored
        let requested = results.len();
        let comparison = Comparison::from_results(results, requested);

        log::info!(
            "✅ Compared {} accounts: {} scored, {} errors, average {:.2}",
            comparison.summary.total_accounts,
            comparison.summary.valid_accounts,
            comparison.summary.errors,
            comparison.summary.average_score
        );

        comparison
    }
}
