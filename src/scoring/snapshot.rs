//! Assembly of an `AccountSnapshot` from fetched data

use super::classifier::classify_all;
use super::types::{AccountSnapshot, RawTransaction};
use std::collections::BTreeMap;

/// ASA amounts are reported in base units; six decimals is assumed for all assets
pub const ASA_BASE_UNITS: f64 = 1e6;

/// Classify a raw history and scale raw holdings into a snapshot
pub fn build_snapshot(
    address: &str,
    raw_transactions: &[RawTransaction],
    raw_holdings: &BTreeMap<u64, u64>,
    now: i64,
) -> AccountSnapshot {
    let (transactions, ignored) = classify_all(raw_transactions, now);

    let asa_holdings = raw_holdings
        .iter()
        .map(|(asset_id, amount)| (*asset_id, *amount as f64 / ASA_BASE_UNITS))
        .collect();

    if ignored > 0 {
        log::debug!(
            "{}: {} of {} transactions were unclassifiable",
            address,
            ignored,
            raw_transactions.len()
        );
    }

    AccountSnapshot {
        address: address.to_string(),
        asa_holdings,
        transactions,
        ignored_transactions: ignored,
    }
}
