use config::{Config, Environment, File};
use serde::Deserialize;
use std::borrow::Cow;
use std::path::Path;
use validator::{Validate, ValidationError};

use crate::core::{PriceRecommender, Ranker};
use crate::error::AppError;
use crate::models::{MarketSignals, PricingConfig, RankingWeights};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct Settings {
    #[validate(nested)]
    pub ranking: RankingSettings,
    #[validate(custom(function = "validate_pricing"))]
    pub pricing: PricingConfig,
    #[validate(custom(function = "validate_market_signals"))]
    pub market_signals: MarketSignals,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RankingSettings {
    #[validate(custom(function = "validate_weights"))]
    pub weights: RankingWeights,
    /// Default minimum numeric availability, applied when a request sets none
    #[validate(range(min = 0.0))]
    pub required_availability: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the structs
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with MARKET__)
    pub fn load() -> Result<Self, AppError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., MARKET__RANKING__WEIGHTS__DISTANCE -> ranking.weights.distance
            .add_source(market_env())
            .build()?;

        Self::finish(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(market_env())
            .build()?;

        Self::finish(settings)
    }

    fn finish(config: Config) -> Result<Self, AppError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn ranker(&self) -> Ranker {
        Ranker::new(self.ranking.weights)
    }

    pub fn price_recommender(&self) -> PriceRecommender {
        PriceRecommender::new(self.pricing)
    }
}

fn market_env() -> Environment {
    Environment::with_prefix("MARKET")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn invalid(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::from(message));
    error
}

fn validate_weights(weights: &RankingWeights) -> Result<(), ValidationError> {
    let named = [
        ("distance", weights.distance),
        ("grading", weights.grading),
        ("pricing", weights.pricing),
        ("availability", weights.availability),
        ("reviews", weights.reviews),
        ("demand_supply", weights.demand_supply),
    ];

    for (name, weight) in named {
        if !weight.is_finite() || weight < 0.0 {
            return Err(invalid(
                "negative_weight",
                format!("weight `{}` must be a non-negative number, got {}", name, weight),
            ));
        }
    }

    Ok(())
}

fn validate_pricing(pricing: &PricingConfig) -> Result<(), ValidationError> {
    if pricing.min_multiplier > pricing.max_multiplier {
        return Err(invalid(
            "inverted_bounds",
            format!(
                "min_multiplier {} exceeds max_multiplier {}",
                pricing.min_multiplier, pricing.max_multiplier
            ),
        ));
    }

    if pricing.grade_min_multiplier > pricing.grade_max_multiplier {
        return Err(invalid(
            "inverted_bounds",
            format!(
                "grade_min_multiplier {} exceeds grade_max_multiplier {}",
                pricing.grade_min_multiplier, pricing.grade_max_multiplier
            ),
        ));
    }

    if pricing.base_spread_pct < 0.0 || pricing.max_extra_spread_pct < 0.0 {
        return Err(invalid(
            "negative_spread",
            "spread percentages must not be negative".to_string(),
        ));
    }

    Ok(())
}

fn validate_market_signals(signals: &MarketSignals) -> Result<(), ValidationError> {
    for (material, signal) in signals {
        let indices = [signal.demand_index, signal.supply_index];
        if indices
            .into_iter()
            .flatten()
            .any(|index| !(0.0..=1.0).contains(&index))
        {
            return Err(invalid(
                "index_out_of_range",
                format!("market signal indices for `{}` must lie in [0, 1]", material),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MarketSignal;

    #[test]
    fn test_default_weights() {
        let settings = Settings::default();
        assert_eq!(settings.ranking.weights.distance, 0.28);
        assert_eq!(settings.ranking.weights.grading, 0.22);
        assert_eq!(settings.ranking.weights.pricing, 0.18);
        assert_eq!(settings.ranking.weights.availability, 0.10);
        assert_eq!(settings.ranking.weights.reviews, 0.12);
        assert_eq!(settings.ranking.weights.demand_supply, 0.10);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut settings = Settings::default();
        settings.ranking.weights.reviews = -0.1;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_inverted_multiplier_bounds_rejected() {
        let mut settings = Settings::default();
        settings.pricing.min_multiplier = 1.5;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_out_of_range_signal_rejected() {
        let mut settings = Settings::default();
        settings.market_signals.insert(
            "glass".to_string(),
            MarketSignal {
                demand_index: Some(1.2),
                supply_index: None,
            },
        );
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("market-algo-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"
[ranking.weights]
distance = 0.5

[pricing]
base_spread_pct = 0.05

[market_signals.paper]
demand_index = 0.8
supply_index = 0.3
"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.ranking.weights.distance, 0.5);
        assert_eq!(settings.ranking.weights.grading, 0.22);
        assert_eq!(settings.pricing.base_spread_pct, 0.05);
        assert_eq!(settings.pricing.max_multiplier, 1.25);
        assert_eq!(
            settings.market_signals.get("paper").and_then(|s| s.demand_index),
            Some(0.8)
        );
    }
}
