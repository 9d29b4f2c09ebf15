use tracing::debug;

use crate::core::round_to;
use crate::models::domain::finite;
use crate::models::{
    MarketSignals, PriceQuote, PriceQuoteRequest, PricingConfig, PricingRecommendation,
    PricingRequest,
};

/// Grade, demand and supply all default to the middle of their scale
const NEUTRAL_SIGNAL: f64 = 0.5;

const BASE_CONFIDENCE: f64 = 0.4;
const CONFIDENCE_PER_SIGNAL: f64 = 0.2;

/// Price recommendation engine
///
/// Scales a reference market price by a quality grade multiplier and a
/// demand/supply multiplier, then wraps the result in a band that widens
/// as fewer signals are supplied.
#[derive(Debug, Clone)]
pub struct PriceRecommender {
    config: PricingConfig,
}

impl PriceRecommender {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn with_default_config() -> Self {
        Self {
            config: PricingConfig::default(),
        }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Recommend a price with its band and confidence.
    ///
    /// A base price that is not a finite positive number yields
    /// [`PricingRecommendation::zero`].
    pub fn recommend(&self, request: &PricingRequest) -> PricingRecommendation {
        let base_price = request.base_market_price;
        if !base_price.is_finite() || base_price <= 0.0 {
            debug!(base_price, "Unusable base market price, returning zero recommendation");
            return PricingRecommendation::zero();
        }

        let config = &self.config;
        let demand_index = finite(request.demand_index).unwrap_or(NEUTRAL_SIGNAL);
        let supply_index = finite(request.supply_index).unwrap_or(NEUTRAL_SIGNAL);

        let multiplier = grade_multiplier(request.grade, config)
            * demand_supply_multiplier(demand_index, supply_index, config);
        let recommended_price = round_to(base_price * multiplier, 2);

        let signal_count = [request.grade, request.demand_index, request.supply_index]
            .into_iter()
            .filter(|signal| finite(*signal).is_some())
            .count();
        let confidence = clamp(
            BASE_CONFIDENCE + CONFIDENCE_PER_SIGNAL * signal_count as f64,
            0.0,
            1.0,
        );

        let spread = config.base_spread_pct + (1.0 - confidence) * config.max_extra_spread_pct;

        debug!(
            base_price,
            multiplier,
            signal_count,
            spread,
            "Computed price recommendation"
        );

        PricingRecommendation {
            recommended_price,
            low: round_to(recommended_price * (1.0 - spread), 2),
            high: round_to(recommended_price * (1.0 + spread), 2),
            multiplier: round_to(multiplier, 4),
            confidence: round_to(confidence, 2),
        }
    }

    /// Quote a listing price, filling missing indices from `signals`
    pub fn quote(&self, request: &PriceQuoteRequest, signals: &MarketSignals) -> PriceQuote {
        PriceQuote {
            material_type: request.material_type.clone(),
            quantity_kg: request.quantity_kg,
            quality_grade: request.quality_grade,
            recommendation: self.recommend(&request.resolve(signals)),
        }
    }
}

impl Default for PriceRecommender {
    fn default() -> Self {
        Self::with_default_config()
    }
}

/// Recommend with an explicit configuration
pub fn recommend_price(request: &PricingRequest, config: &PricingConfig) -> PricingRecommendation {
    PriceRecommender::new(*config).recommend(request)
}

/// Map a grade on a [0,1], [1,5] or [1,10] scale onto [0,1].
///
/// Anything else, including a missing grade, is treated as neutral (0.5).
/// A grade of exactly 1 reads as the top of the [0,1] scale.
pub fn normalize_grade(grade: Option<f64>) -> f64 {
    match finite(grade) {
        Some(g) if (0.0..=1.0).contains(&g) => g,
        Some(g) if (1.0..=5.0).contains(&g) => (g - 1.0) / 4.0,
        Some(g) if (1.0..=10.0).contains(&g) => (g - 1.0) / 9.0,
        _ => NEUTRAL_SIGNAL,
    }
}

pub fn grade_multiplier(grade: Option<f64>, config: &PricingConfig) -> f64 {
    let g = normalize_grade(grade);
    config.grade_min_multiplier + g * (config.grade_max_multiplier - config.grade_min_multiplier)
}

/// Higher demand and lower supply push the multiplier towards
/// `max_multiplier`. Indices are clamped to [0,1].
pub fn demand_supply_multiplier(demand_index: f64, supply_index: f64, config: &PricingConfig) -> f64 {
    let d = clamp(demand_index, 0.0, 1.0);
    let s = clamp(supply_index, 0.0, 1.0);

    let composite = d * config.demand_weight + (1.0 - s) * config.supply_weight;
    let scaled =
        config.min_multiplier + composite * (config.max_multiplier - config.min_multiplier);

    clamp(scaled, config.min_multiplier, config.max_multiplier)
}

/// Non-finite values clamp to `min`
#[inline]
fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() {
        return min;
    }
    value.max(min).min(max)
}
