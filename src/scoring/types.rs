//! Core data types for the scoring pipeline

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Transaction kinds understood by the scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TxType {
    #[serde(rename = "pay")]
    Payment,
    #[serde(rename = "axfer")]
    AssetTransfer,
    #[serde(rename = "appl")]
    AppCall,
    #[serde(rename = "acfg")]
    AssetConfig,
    #[serde(rename = "afrz")]
    AssetFreeze,
    #[serde(rename = "keyreg")]
    KeyRegistration,
}

impl TxType {
    pub fn all() -> [TxType; 6] {
        [
            TxType::Payment,
            TxType::AssetTransfer,
            TxType::AppCall,
            TxType::AssetConfig,
            TxType::AssetFreeze,
            TxType::KeyRegistration,
        ]
    }

    /// Indexer tag for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Payment => "pay",
            TxType::AssetTransfer => "axfer",
            TxType::AppCall => "appl",
            TxType::AssetConfig => "acfg",
            TxType::AssetFreeze => "afrz",
            TxType::KeyRegistration => "keyreg",
        }
    }

    pub fn from_str(tag: &str) -> Option<Self> {
        match tag {
            "pay" => Some(TxType::Payment),
            "axfer" => Some(TxType::AssetTransfer),
            "appl" => Some(TxType::AppCall),
            "acfg" => Some(TxType::AssetConfig),
            "afrz" => Some(TxType::AssetFreeze),
            "keyreg" => Some(TxType::KeyRegistration),
            _ => None,
        }
    }
}

/// `payment-transaction` sub-object of an indexer record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentFields {
    /// Microalgos
    #[serde(default)]
    pub amount: u64,
    #[serde(default)]
    pub receiver: Option<String>,
}

/// `asset-transfer-transaction` sub-object of an indexer record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetTransferFields {
    #[serde(default)]
    pub amount: u64,
    #[serde(default, rename = "asset-id", alias = "assetId")]
    pub asset_id: Option<u64>,
    #[serde(default)]
    pub receiver: Option<String>,
}

/// Unclassified transaction record as returned by the indexer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "tx-type", alias = "txType")]
    pub tx_type: Option<String>,
    /// Unix seconds of the confirming round
    #[serde(default, rename = "round-time", alias = "roundTime")]
    pub round_time: Option<i64>,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(
        default,
        rename = "payment-transaction",
        alias = "paymentTransaction",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment: Option<PaymentFields>,
    #[serde(
        default,
        rename = "asset-transfer-transaction",
        alias = "assetTransferTransaction",
        skip_serializing_if = "Option::is_none"
    )]
    pub asset_transfer: Option<AssetTransferFields>,
}

/// Classified, scoring-ready transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub tx_type: TxType,
    /// ALGO for payments, base units for asset transfers, absent otherwise
    pub amount: Option<f64>,
    pub sender: Option<String>,
    pub counterparty: Option<String>,
    /// Seconds between the round time and the reference `now`
    pub age_secs: u64,
}

impl Transaction {
    /// Unknown senders count as outgoing
    pub fn is_outgoing_from(&self, address: &str) -> bool {
        self.sender.as_deref().map_or(true, |sender| sender == address)
    }
}

/// Everything the composer needs to score one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub address: String,
    /// Asset id -> held amount in whole units
    pub asa_holdings: BTreeMap<u64, f64>,
    pub transactions: Vec<Transaction>,
    /// Raw records the classifier could not use
    #[serde(default)]
    pub ignored_transactions: usize,
}

impl AccountSnapshot {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            asa_holdings: BTreeMap::new(),
            transactions: Vec::new(),
            ignored_transactions: 0,
        }
    }

    pub fn with_transactions(mut self, transactions: Vec<Transaction>) -> Self {
        self.transactions = transactions;
        self
    }

    pub fn with_holdings(mut self, holdings: BTreeMap<u64, f64>) -> Self {
        self.asa_holdings = holdings;
        self
    }

    /// Age of the most recent transaction, if any
    pub fn newest_age_secs(&self) -> Option<u64> {
        self.transactions.iter().map(|tx| tx.age_secs).min()
    }
}

/// Descriptive statistics reported next to the score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityAnalysis {
    pub total_transactions: usize,
    pub ignored_transactions: usize,
    pub unique_receivers: usize,
    /// Payment volume in ALGO
    pub total_volume: f64,
    pub avg_transaction_size: f64,
    pub transaction_types: BTreeMap<String, usize>,
    pub asa_holdings_count: usize,
}

/// Auditable decomposition of a single reputation score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub address: String,
    pub transaction_score: f64,
    pub frequency_score: f64,
    pub pattern_bonuses: f64,
    pub decay_penalty: f64,
    pub holdings_bonus: f64,
    /// Sum of the five contributions, unclamped
    pub raw_score: f64,
    /// Raw score normalized to [0, 100]
    pub reputation_score: f64,
    pub analysis: ActivityAnalysis,
}
