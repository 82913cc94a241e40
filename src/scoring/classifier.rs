//! Transaction classification from raw indexer records
//!
//! Classification never fails: a record that cannot be mapped to one of the
//! known transaction types, or that carries no usable round time, is dropped
//! and contributes nothing to the score.

use super::types::{RawTransaction, Transaction, TxType};

const MICROALGOS_PER_ALGO: f64 = 1e6;

/// Classify one raw record against the reference time `now` (unix seconds)
pub fn classify(raw: &RawTransaction, now: i64) -> Option<Transaction> {
    let tx_type = raw.tx_type.as_deref().and_then(TxType::from_str)?;

    let round_time = raw.round_time.filter(|&t| t > 0)?;

    // Clock skew between the indexer and this host can yield negative ages
    let age_secs = now.saturating_sub(round_time).max(0) as u64;

    let (amount, counterparty) = match tx_type {
        TxType::Payment => {
            let payment = raw.payment.as_ref();
            (
                Some(payment.map_or(0, |p| p.amount) as f64 / MICROALGOS_PER_ALGO),
                payment.and_then(|p| p.receiver.clone()),
            )
        }
        TxType::AssetTransfer => {
            let transfer = raw.asset_transfer.as_ref();
            (
                Some(transfer.map_or(0, |t| t.amount) as f64),
                transfer.and_then(|t| t.receiver.clone()),
            )
        }
        _ => (None, None),
    };

    Some(Transaction {
        tx_type,
        amount,
        sender: raw.sender.clone(),
        counterparty,
        age_secs,
    })
}

/// Classify a whole history, returning the usable transactions and the
/// number of records that were dropped
pub fn classify_all(raws: &[RawTransaction], now: i64) -> (Vec<Transaction>, usize) {
    let mut transactions = Vec::with_capacity(raws.len());
    let mut ignored = 0;

    for raw in raws {
        match classify(raw, now) {
            Some(tx) => transactions.push(tx),
            None => {
                ignored += 1;
                log::debug!(
                    "Ignoring unclassifiable transaction {} (type={:?}, round_time={:?})",
                    raw.id.as_deref().unwrap_or("<no id>"),
                    raw.tx_type,
                    raw.round_time
                );
            }
        }
    }

    (transactions, ignored)
}
