//! Ranking, summary statistics and insights over a batch result

use crate::scoring::ScoreBreakdown;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Score at or above which an account counts as high-reputation
pub const HIGH_SCORE_THRESHOLD: f64 = 70.0;

/// Outcome of scoring one address in a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AccountOutcome {
    Scored(ScoreBreakdown),
    Failed { reason: String },
}

impl AccountOutcome {
    pub fn breakdown(&self) -> Option<&ScoreBreakdown> {
        match self {
            AccountOutcome::Scored(breakdown) => Some(breakdown),
            AccountOutcome::Failed { .. } => None,
        }
    }

    pub fn reputation_score(&self) -> Option<f64> {
        self.breakdown().map(|b| b.reputation_score)
    }

    pub fn is_scored(&self) -> bool {
        matches!(self, AccountOutcome::Scored(_))
    }
}

/// Outcomes keyed by address
pub type BatchResult = BTreeMap<String, AccountOutcome>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAccount {
    pub address: String,
    pub score: f64,
    /// 1-based
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub total_accounts: usize,
    pub valid_accounts: usize,
    pub errors: usize,
    pub highest_score: f64,
    pub lowest_score: f64,
    pub average_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub ranking: Vec<RankedAccount>,
    pub summary: ComparisonSummary,
    pub detailed_results: BatchResult,
}

impl Comparison {
    pub fn from_results(results: BatchResult, requested: usize) -> Self {
        Self {
            ranking: rank_accounts(&results),
            summary: summarize(&results, requested),
            detailed_results: results,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    /// >= 90
    pub excellent: usize,
    /// [70, 90)
    pub good: usize,
    /// [50, 70)
    pub fair: usize,
    /// < 50
    pub poor: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReputationInsights {
    pub total_accounts_analyzed: usize,
    pub high_score_accounts: usize,
    pub high_score_percentage: f64,
    pub transaction_type_distribution: BTreeMap<String, usize>,
    pub most_common_txn_type: Option<String>,
    pub score_distribution: ScoreDistribution,
}

/// Successful accounts sorted by descending score, ties broken by address
pub fn rank_accounts(results: &BatchResult) -> Vec<RankedAccount> {
    let mut scored: Vec<(&String, f64)> = results
        .iter()
        .filter_map(|(address, outcome)| outcome.reputation_score().map(|s| (address, s)))
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    scored
        .into_iter()
        .enumerate()
        .map(|(i, (address, score))| RankedAccount {
            address: address.clone(),
            score,
            rank: i + 1,
        })
        .collect()
}

/// Count, average, min and max over the successful subset
///
/// Statistics are 0.0 when no account was scored.
pub fn summarize(results: &BatchResult, requested: usize) -> ComparisonSummary {
    let scores: Vec<f64> = results
        .values()
        .filter_map(AccountOutcome::reputation_score)
        .collect();

    let (highest_score, lowest_score, average_score) = if scores.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        (
            scores.iter().copied().fold(f64::MIN, f64::max),
            scores.iter().copied().fold(f64::MAX, f64::min),
            scores.iter().sum::<f64>() / scores.len() as f64,
        )
    };

    ComparisonSummary {
        total_accounts: requested,
        valid_accounts: scores.len(),
        errors: results.len() - scores.len(),
        highest_score,
        lowest_score,
        average_score,
    }
}

/// Patterns across the successfully scored accounts
pub fn insights(results: &BatchResult) -> ReputationInsights {
    let mut transaction_type_distribution: BTreeMap<String, usize> = BTreeMap::new();
    let mut score_distribution = ScoreDistribution::default();
    let mut analyzed = 0;
    let mut high_score_accounts = 0;

    for breakdown in results.values().filter_map(AccountOutcome::breakdown) {
        analyzed += 1;
        let score = breakdown.reputation_score;

        if score >= HIGH_SCORE_THRESHOLD {
            high_score_accounts += 1;
        }

        if score >= 90.0 {
            score_distribution.excellent += 1;
        } else if score >= 70.0 {
            score_distribution.good += 1;
        } else if score >= 50.0 {
            score_distribution.fair += 1;
        } else {
            score_distribution.poor += 1;
        }

        for (tx_type, count) in &breakdown.analysis.transaction_types {
            *transaction_type_distribution.entry(tx_type.clone()).or_insert(0) += count;
        }
    }

    // Highest count wins, the alphabetically first tag on ties
    let most_common_txn_type = transaction_type_distribution
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(tag, _)| tag.clone());

    let high_score_percentage = if analyzed > 0 {
        high_score_accounts as f64 / analyzed as f64 * 100.0
    } else {
        0.0
    };

    ReputationInsights {
        total_accounts_analyzed: analyzed,
        high_score_accounts,
        high_score_percentage,
        transaction_type_distribution,
        most_common_txn_type,
        score_distribution,
    }
}
