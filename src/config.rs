//! Scoring configuration
//!
//! Every weight and threshold the signal calculators and the composer read
//! lives here. A `ReputationConfig` is immutable once built; overrides go
//! through [`ReputationConfigBuilder`] and are validated in `build()`.
//!
//! ## Environment overrides
//!
//! `ReputationConfig::from_env()` starts from the defaults and applies any
//! `ALGOREP_<FIELD>` variable that is set, e.g. `ALGOREP_RECENT_WEIGHT=12`.

use crate::error::ConfigError;
use serde::Serialize;
use std::env;
use std::str::FromStr;

/// Approximately six months, the default staleness threshold
pub const SIX_MONTHS_SECS: u64 = 60 * 60 * 24 * 30 * 6;

/// Default recency half-life (90 days)
pub const DEFAULT_HALF_LIFE_SECS: u64 = 60 * 60 * 24 * 90;

macro_rules! reputation_weights {
    ($( $(#[$doc:meta])* $field:ident : $ty:ty = $default:expr, $var:literal; )*) => {
        /// Immutable scoring configuration
        #[derive(Debug, Clone, PartialEq, Serialize)]
        pub struct ReputationConfig {
            $( $field: $ty, )*
        }

        impl ReputationConfig {
            fn defaults() -> Self {
                Self { $( $field: $default, )* }
            }

            $(
                $(#[$doc])*
                pub fn $field(&self) -> $ty {
                    self.$field
                }
            )*
        }

        /// Builder that starts from the documented defaults
        #[derive(Debug, Clone)]
        pub struct ReputationConfigBuilder {
            inner: ReputationConfig,
        }

        impl ReputationConfigBuilder {
            $(
                pub fn $field(mut self, value: $ty) -> Self {
                    self.inner.$field = value;
                    self
                }
            )*

            fn apply_overrides(
                mut self,
                lookup: &dyn Fn(&str) -> Option<String>,
            ) -> Result<Self, ConfigError> {
                $(
                    if let Some(value) = parse_override::<$ty>(lookup, $var)? {
                        self = self.$field(value);
                    }
                )*
                Ok(self)
            }
        }
    };
}

reputation_weights! {
    /// Recency factor for a transaction of age zero
    recent_weight: f64 = 10.0, "ALGOREP_RECENT_WEIGHT";
    /// Floor the recency factor approaches for old activity
    stale_weight: f64 = 5.0, "ALGOREP_STALE_WEIGHT";
    /// Age at which the recency factor sits halfway between recent and stale
    recency_half_life_secs: u64 = DEFAULT_HALF_LIFE_SECS, "ALGOREP_RECENCY_HALF_LIFE_SECS";
    payment_points: f64 = 1.0, "ALGOREP_PAYMENT_POINTS";
    asset_transfer_points: f64 = 10.0, "ALGOREP_ASSET_TRANSFER_POINTS";
    app_call_points: f64 = 20.0, "ALGOREP_APP_CALL_POINTS";
    asset_config_points: f64 = 15.0, "ALGOREP_ASSET_CONFIG_POINTS";
    asset_freeze_points: f64 = 5.0, "ALGOREP_ASSET_FREEZE_POINTS";
    keyreg_points: f64 = 25.0, "ALGOREP_KEYREG_POINTS";
    /// Payment amount (ALGO) that must be exceeded to earn the volume bonus
    large_transaction_threshold: f64 = 10.0, "ALGOREP_LARGE_TRANSACTION_THRESHOLD";
    /// Multiplier for a large payment's contribution
    large_transaction_bonus: f64 = 1.5, "ALGOREP_LARGE_TRANSACTION_BONUS";
    receiver_diversity_bonus: f64 = 5.0, "ALGOREP_RECEIVER_DIVERSITY_BONUS";
    /// Distinct outgoing counterparties needed for the diversity bonus (inclusive)
    min_unique_receivers: usize = 3, "ALGOREP_MIN_UNIQUE_RECEIVERS";
    /// Transaction count at which the high-frequency penalty applies (inclusive)
    high_frequency_penalty_threshold: usize = 1000, "ALGOREP_HIGH_FREQUENCY_PENALTY_THRESHOLD";
    high_frequency_penalty: f64 = -10.0, "ALGOREP_HIGH_FREQUENCY_PENALTY";
    normal_activity_reward: f64 = 10.0, "ALGOREP_NORMAL_ACTIVITY_REWARD";
    /// Age of the newest transaction beyond which an account counts as inactive
    inactivity_threshold_secs: u64 = SIX_MONTHS_SECS, "ALGOREP_INACTIVITY_THRESHOLD_SECS";
    inactivity_penalty: f64 = -10.0, "ALGOREP_INACTIVITY_PENALTY";
    asa_holding_multiplier: f64 = 0.1, "ALGOREP_ASA_HOLDING_MULTIPLIER";
    /// Raw score that maps to a reputation of 100
    normalization_cap: f64 = 100.0, "ALGOREP_NORMALIZATION_CAP";
}

fn parse_override<T: FromStr>(
    lookup: &dyn Fn(&str) -> Option<String>,
    var: &str,
) -> Result<Option<T>, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|_| ConfigError::Parse {
            var: var.to_string(),
            value: raw.clone(),
        })
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

impl ReputationConfig {
    pub fn builder() -> ReputationConfigBuilder {
        ReputationConfigBuilder {
            inner: Self::defaults(),
        }
    }

    /// Load configuration from `ALGOREP_*` environment variables over the defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as `from_env` but with an injectable variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::builder().apply_overrides(&lookup)?.build()
    }

    /// Copy this configuration into a builder for further overrides
    pub fn to_builder(&self) -> ReputationConfigBuilder {
        ReputationConfigBuilder {
            inner: self.clone(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let floats = [
            ("recent_weight", self.recent_weight),
            ("stale_weight", self.stale_weight),
            ("payment_points", self.payment_points),
            ("asset_transfer_points", self.asset_transfer_points),
            ("app_call_points", self.app_call_points),
            ("asset_config_points", self.asset_config_points),
            ("asset_freeze_points", self.asset_freeze_points),
            ("keyreg_points", self.keyreg_points),
            ("large_transaction_threshold", self.large_transaction_threshold),
            ("large_transaction_bonus", self.large_transaction_bonus),
            ("receiver_diversity_bonus", self.receiver_diversity_bonus),
            ("high_frequency_penalty", self.high_frequency_penalty),
            ("normal_activity_reward", self.normal_activity_reward),
            ("inactivity_penalty", self.inactivity_penalty),
            ("asa_holding_multiplier", self.asa_holding_multiplier),
            ("normalization_cap", self.normalization_cap),
        ];
        for (field, value) in floats {
            if !value.is_finite() {
                return Err(ConfigError::invalid(field, "must be a finite number"));
            }
        }

        // Non-negative weights keep the type score monotonic in recency
        let non_negative = [
            ("stale_weight", self.stale_weight),
            ("payment_points", self.payment_points),
            ("asset_transfer_points", self.asset_transfer_points),
            ("app_call_points", self.app_call_points),
            ("asset_config_points", self.asset_config_points),
            ("asset_freeze_points", self.asset_freeze_points),
            ("keyreg_points", self.keyreg_points),
            ("large_transaction_threshold", self.large_transaction_threshold),
            ("receiver_diversity_bonus", self.receiver_diversity_bonus),
            ("normal_activity_reward", self.normal_activity_reward),
            ("asa_holding_multiplier", self.asa_holding_multiplier),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::invalid(field, format!("must be >= 0, got {}", value)));
            }
        }

        if self.recent_weight < self.stale_weight {
            return Err(ConfigError::invalid(
                "recent_weight",
                format!(
                    "must be >= stale_weight ({}), got {}",
                    self.stale_weight, self.recent_weight
                ),
            ));
        }
        if self.recency_half_life_secs == 0 {
            return Err(ConfigError::invalid("recency_half_life_secs", "must be > 0"));
        }
        if self.large_transaction_bonus < 1.0 {
            return Err(ConfigError::invalid(
                "large_transaction_bonus",
                format!("must be >= 1.0, got {}", self.large_transaction_bonus),
            ));
        }
        if self.high_frequency_penalty_threshold == 0 {
            return Err(ConfigError::invalid(
                "high_frequency_penalty_threshold",
                "must be >= 1",
            ));
        }
        if self.high_frequency_penalty > 0.0 {
            return Err(ConfigError::invalid(
                "high_frequency_penalty",
                format!("must be <= 0, got {}", self.high_frequency_penalty),
            ));
        }
        if self.inactivity_threshold_secs == 0 {
            return Err(ConfigError::invalid("inactivity_threshold_secs", "must be > 0"));
        }
        if self.inactivity_penalty > 0.0 {
            return Err(ConfigError::invalid(
                "inactivity_penalty",
                format!("must be <= 0, got {}", self.inactivity_penalty),
            ));
        }
        if self.normalization_cap <= 0.0 {
            return Err(ConfigError::invalid(
                "normalization_cap",
                format!("must be > 0, got {}", self.normalization_cap),
            ));
        }

        Ok(())
    }
}

impl ReputationConfigBuilder {
    pub fn build(self) -> Result<ReputationConfig, ConfigError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ReputationConfig::default();

        assert_eq!(config.recent_weight(), 10.0);
        assert_eq!(config.stale_weight(), 5.0);
        assert_eq!(config.payment_points(), 1.0);
        assert_eq!(config.asset_transfer_points(), 10.0);
        assert_eq!(config.app_call_points(), 20.0);
        assert_eq!(config.asset_config_points(), 15.0);
        assert_eq!(config.asset_freeze_points(), 5.0);
        assert_eq!(config.keyreg_points(), 25.0);
        assert_eq!(config.high_frequency_penalty_threshold(), 1000);
        assert_eq!(config.high_frequency_penalty(), -10.0);
        assert_eq!(config.normal_activity_reward(), 10.0);
        assert_eq!(config.inactivity_threshold_secs(), SIX_MONTHS_SECS);
        assert_eq!(config.inactivity_penalty(), -10.0);
        assert_eq!(config.asa_holding_multiplier(), 0.1);
        assert_eq!(config.normalization_cap(), 100.0);
        assert_eq!(config.large_transaction_bonus(), 1.5);
        assert_eq!(config.large_transaction_threshold(), 10.0);
        assert_eq!(config.receiver_diversity_bonus(), 5.0);
        assert_eq!(config.min_unique_receivers(), 3);

        // Defaults must pass their own validation
        assert!(ReputationConfig::builder().build().is_ok());
    }

    #[test]
    fn test_overrides_are_independent() {
        let config = ReputationConfig::builder()
            .recent_weight(15.0)
            .stale_weight(8.0)
            .asa_holding_multiplier(0.2)
            .build()
            .unwrap();

        assert_eq!(config.recent_weight(), 15.0);
        assert_eq!(config.stale_weight(), 8.0);
        assert_eq!(config.asa_holding_multiplier(), 0.2);
        assert_eq!(config.app_call_points(), 20.0);
    }

    #[test]
    fn test_rejects_non_positive_cap() {
        let err = ReputationConfig::builder()
            .normalization_cap(-1.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "normalization_cap", .. }));

        assert!(ReputationConfig::builder().normalization_cap(0.0).build().is_err());
    }

    #[test]
    fn test_rejects_inverted_recency_weights() {
        let err = ReputationConfig::builder()
            .recent_weight(2.0)
            .stale_weight(5.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "recent_weight", .. }));
    }

    #[test]
    fn test_rejects_positive_penalties_and_nan() {
        assert!(ReputationConfig::builder().inactivity_penalty(3.0).build().is_err());
        assert!(ReputationConfig::builder().high_frequency_penalty(1.0).build().is_err());
        assert!(ReputationConfig::builder().keyreg_points(f64::NAN).build().is_err());
        assert!(ReputationConfig::builder().large_transaction_bonus(0.5).build().is_err());
        assert!(ReputationConfig::builder().high_frequency_penalty_threshold(0).build().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = ReputationConfig::from_lookup(lookup_from(&[
            ("ALGOREP_RECENT_WEIGHT", "12.5"),
            ("ALGOREP_MIN_UNIQUE_RECEIVERS", " 7 "),
            ("ALGOREP_NORMALIZATION_CAP", ""),
        ]))
        .unwrap();

        assert_eq!(config.recent_weight(), 12.5);
        assert_eq!(config.min_unique_receivers(), 7);
        assert_eq!(config.normalization_cap(), 100.0);
    }

    #[test]
    fn test_env_negative_receiver_count_rejected() {
        let err = ReputationConfig::from_lookup(lookup_from(&[(
            "ALGOREP_MIN_UNIQUE_RECEIVERS",
            "-2",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_to_builder_keeps_values() {
        let base = ReputationConfig::builder().keyreg_points(40.0).build().unwrap();
        let derived = base.to_builder().app_call_points(1.0).build().unwrap();

        assert_eq!(derived.keyreg_points(), 40.0);
        assert_eq!(derived.app_call_points(), 1.0);
    }
}
