//! Scoring Core - Single-Account Reputation Pipeline
//!
//! # Architecture
//!
//! ```text
//! RawTransaction[] + holdings
//!     ↓
//! classifier (typed Transaction, age from reference now)
//!     ↓
//! signals (type score, frequency, diversity, decay, holdings)
//!     ↓
//! composer (raw score → normalized [0, 100] + ScoreBreakdown)
//! ```
//!
//! Every stage is synchronous and pure. Failure handling lives at the
//! data-fetch boundary, never here.

pub mod classifier;
pub mod composer;
pub mod signals;
pub mod snapshot;
pub mod types;

pub use classifier::{classify, classify_all};
pub use composer::{analyze, normalize, score, score_detailed};
pub use snapshot::build_snapshot;
pub use types::{
    AccountSnapshot, ActivityAnalysis, AssetTransferFields, PaymentFields, RawTransaction,
    ScoreBreakdown, Transaction, TxType,
};
