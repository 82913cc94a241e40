//! Multi-account scoring and comparison

pub mod ranking;
pub mod scorer;

pub use ranking::{
    insights, rank_accounts, summarize, AccountOutcome, BatchResult, Comparison,
    ComparisonSummary, RankedAccount, ReputationInsights, ScoreDistribution,
    HIGH_SCORE_THRESHOLD,
};
pub use scorer::{score_address, BatchOptions, BatchScorer};
