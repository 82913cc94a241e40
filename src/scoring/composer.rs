//! Score composition and normalization

use super::signals;
use super::types::{AccountSnapshot, ActivityAnalysis, ScoreBreakdown, TxType};
use crate::config::ReputationConfig;
use std::collections::BTreeMap;

/// Reputation score in [0, 100] for a snapshot
pub fn score(snapshot: &AccountSnapshot, config: &ReputationConfig) -> f64 {
    score_detailed(snapshot, config).reputation_score
}

/// Full breakdown of every signal contribution for a snapshot
pub fn score_detailed(snapshot: &AccountSnapshot, config: &ReputationConfig) -> ScoreBreakdown {
    let transactions = &snapshot.transactions;

    let transaction_score = signals::transaction_score(transactions, config);
    let frequency_score = signals::frequency_score(transactions, config);
    let pattern_bonuses = signals::pattern_bonus(transactions, snapshot, config);
    let decay_penalty = signals::inactivity_decay(transactions, config);
    let holdings_bonus = signals::holdings_bonus(snapshot, config);

    // Penalties are already signed, so every term is added
    let raw_score =
        transaction_score + frequency_score + pattern_bonuses + decay_penalty + holdings_bonus;

    let reputation_score = normalize(raw_score, config);

    log::debug!(
        "Scored {}: raw={:.4} reputation={:.2} (tx={:.2} freq={:.2} pattern={:.2} decay={:.2} holdings={:.2})",
        snapshot.address,
        raw_score,
        reputation_score,
        transaction_score,
        frequency_score,
        pattern_bonuses,
        decay_penalty,
        holdings_bonus
    );

    ScoreBreakdown {
        address: snapshot.address.clone(),
        transaction_score,
        frequency_score,
        pattern_bonuses,
        decay_penalty,
        holdings_bonus,
        raw_score,
        reputation_score,
        analysis: analyze(snapshot),
    }
}

/// Rescale a raw score against the normalization cap, clamp to [0, 100]
/// and round to two decimals
pub fn normalize(raw_score: f64, config: &ReputationConfig) -> f64 {
    if raw_score.is_nan() {
        return 0.0;
    }
    let scaled = (raw_score / config.normalization_cap() * 100.0).clamp(0.0, 100.0);
    (scaled * 100.0).round() / 100.0
}

/// Descriptive activity statistics for a snapshot
pub fn analyze(snapshot: &AccountSnapshot) -> ActivityAnalysis {
    let transactions = &snapshot.transactions;

    let mut transaction_types: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_volume = 0.0;

    for tx in transactions {
        *transaction_types
            .entry(tx.tx_type.as_str().to_string())
            .or_insert(0) += 1;

        if tx.tx_type == TxType::Payment {
            total_volume += tx.amount.unwrap_or(0.0);
        }
    }

    let avg_transaction_size = if transactions.is_empty() {
        0.0
    } else {
        total_volume / transactions.len() as f64
    };

    ActivityAnalysis {
        total_transactions: transactions.len(),
        ignored_transactions: snapshot.ignored_transactions,
        unique_receivers: signals::unique_receivers(transactions, &snapshot.address),
        total_volume,
        avg_transaction_size,
        transaction_types,
        asa_holdings_count: snapshot.asa_holdings.len(),
    }
}
