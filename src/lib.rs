//! algorep - explainable reputation scoring for Algorand accounts
//!
//! ```text
//! AccountDataSource (indexer / fixtures)
//!     ↓
//! scoring (classify → signals → compose)
//!     ↓
//! batch (bounded fan-out, ranking, summary)
//!     ↓
//! export (JSON / CSV / SQLite)
//! ```

pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod scoring;

pub use batch::{BatchOptions, BatchScorer, Comparison};
pub use client::{AccountDataSource, ClientConfig, IndexerClient, MemorySource};
pub use config::ReputationConfig;
pub use error::{ConfigError, ExportError, FetchError};
pub use scoring::{score, score_detailed, ScoreBreakdown};
