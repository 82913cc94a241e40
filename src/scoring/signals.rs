//! Signal calculators
//!
//! Each calculator is a pure function of the classified transactions, the
//! account snapshot and the configuration. All of them accept an empty
//! history and return their no-activity baseline.
//!
//! # Signals
//! - Recency-weighted type score (with the large-payment volume bonus)
//! - Frequency reward / high-frequency penalty (one breakpoint, inclusive)
//! - Receiver-diversity bonus (inclusive)
//! - Inactivity decay
//! - ASA holdings bonus

use super::types::{AccountSnapshot, Transaction, TxType};
use crate::config::ReputationConfig;
use std::collections::HashSet;

/// Recency weight for a transaction of the given age
///
/// Exponential falloff from `recent_weight` at age zero towards
/// `stale_weight`, halving the gap every `recency_half_life_secs`.
pub fn recency_factor(age_secs: u64, config: &ReputationConfig) -> f64 {
    let recent = config.recent_weight();
    let stale = config.stale_weight();
    let half_lives = age_secs as f64 / config.recency_half_life_secs() as f64;

    stale + (recent - stale) * 0.5_f64.powf(half_lives)
}

/// Configured points for a transaction type
pub fn type_points(tx_type: TxType, config: &ReputationConfig) -> f64 {
    match tx_type {
        TxType::Payment => config.payment_points(),
        TxType::AssetTransfer => config.asset_transfer_points(),
        TxType::AppCall => config.app_call_points(),
        TxType::AssetConfig => config.asset_config_points(),
        TxType::AssetFreeze => config.asset_freeze_points(),
        TxType::KeyRegistration => config.keyreg_points(),
    }
}

/// Payments strictly above the threshold earn the volume bonus
pub fn is_large_payment(tx: &Transaction, config: &ReputationConfig) -> bool {
    tx.tx_type == TxType::Payment
        && tx
            .amount
            .map_or(false, |amount| amount > config.large_transaction_threshold())
}

/// Contribution of a single transaction to the type score
pub fn transaction_contribution(tx: &Transaction, config: &ReputationConfig) -> f64 {
    let base = type_points(tx.tx_type, config) * recency_factor(tx.age_secs, config);

    if is_large_payment(tx, config) {
        base * config.large_transaction_bonus()
    } else {
        base
    }
}

pub fn transaction_score(transactions: &[Transaction], config: &ReputationConfig) -> f64 {
    transactions
        .iter()
        .map(|tx| transaction_contribution(tx, config))
        .sum()
}

pub fn frequency_score(transactions: &[Transaction], config: &ReputationConfig) -> f64 {
    let count = transactions.len();
    if count == 0 {
        0.0
    } else if count >= config.high_frequency_penalty_threshold() {
        config.high_frequency_penalty()
    } else {
        config.normal_activity_reward()
    }
}

/// Distinct counterparties across the account's outgoing transactions
pub fn unique_receivers(transactions: &[Transaction], address: &str) -> usize {
    transactions
        .iter()
        .filter(|tx| tx.is_outgoing_from(address))
        .filter_map(|tx| tx.counterparty.as_deref())
        .filter(|receiver| *receiver != address)
        .collect::<HashSet<_>>()
        .len()
}

pub fn pattern_bonus(
    transactions: &[Transaction],
    snapshot: &AccountSnapshot,
    config: &ReputationConfig,
) -> f64 {
    let receivers = unique_receivers(transactions, &snapshot.address);
    if receivers >= config.min_unique_receivers() {
        config.receiver_diversity_bonus()
    } else {
        0.0
    }
}

/// Signed penalty for accounts whose newest activity is too old
pub fn inactivity_decay(transactions: &[Transaction], config: &ReputationConfig) -> f64 {
    match transactions.iter().map(|tx| tx.age_secs).min() {
        Some(newest) if newest <= config.inactivity_threshold_secs() => 0.0,
        // No transactions at all counts as maximally stale
        _ => config.inactivity_penalty(),
    }
}

pub fn holdings_bonus(snapshot: &AccountSnapshot, config: &ReputationConfig) -> f64 {
    let held: f64 = snapshot
        .asa_holdings
        .values()
        .filter(|amount| amount.is_finite() && **amount > 0.0)
        .sum();
    held * config.asa_holding_multiplier()
}
