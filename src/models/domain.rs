use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A point on the globe in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Availability is either a hard available/unavailable flag or a numeric
/// capacity signal (e.g. kilograms on hand).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Availability {
    Flag(bool),
    Level(f64),
}

impl Availability {
    pub fn flag(&self) -> Option<bool> {
        match self {
            Availability::Flag(flag) => Some(*flag),
            Availability::Level(_) => None,
        }
    }

    /// Numeric level, only when it is a finite number
    pub fn level(&self) -> Option<f64> {
        match self {
            Availability::Level(level) => finite(Some(*level)),
            Availability::Flag(_) => None,
        }
    }
}

/// A vendor or listing offered to a buyer, as handed over by the caller.
///
/// Every field is optional. Fields this engine does not know about are kept
/// in `extra` and written back out untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grading: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demand_index: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply_index: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CandidateRecord {
    /// Vendor location: the nested `location` when set, otherwise the flat
    /// `lat`/`lng` pair.
    pub fn location_point(&self) -> Option<GeoPoint> {
        match self.location {
            Some(point) => Some(point),
            None => Some(GeoPoint::new(self.lat?, self.lng?)),
        }
    }

    /// First finite value among `reviewRating`, `reviewsRating`, `reviewsScore`
    pub fn resolved_review_rating(&self) -> Option<f64> {
        finite(self.review_rating)
            .or_else(|| finite(self.reviews_rating))
            .or_else(|| finite(self.reviews_score))
    }

    /// `materialType`, falling back to the legacy `material` field
    pub fn resolved_material_type(&self) -> Option<&str> {
        self.material_type
            .as_deref()
            .filter(|m| !m.is_empty())
            .or_else(|| self.material.as_deref().filter(|m| !m.is_empty()))
    }

    pub fn availability_flag(&self) -> Option<bool> {
        self.availability.and_then(|a| a.flag())
    }

    pub fn availability_level(&self) -> Option<f64> {
        self.availability.and_then(|a| a.level())
    }
}

/// Live demand/supply pressure for one material, both in [0,1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSignal {
    #[serde(default, alias = "demandIndex")]
    pub demand_index: Option<f64>,
    #[serde(default, alias = "supplyIndex")]
    pub supply_index: Option<f64>,
}

/// Market signals keyed by material type
pub type MarketSignals = HashMap<String, MarketSignal>;

/// Per-call ranking options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingOptions {
    #[serde(default)]
    pub required_availability: Option<f64>,
    #[serde(default)]
    pub buyer_location: Option<GeoPoint>,
    #[serde(default)]
    pub market_signals: Option<MarketSignals>,
}

/// Ranking weights for the six scored dimensions
///
/// The defaults sum to 1.0, so composite scores land in [0,1]. The sum is
/// not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
    pub distance: f64,
    pub grading: f64,
    pub pricing: f64,
    pub availability: f64,
    pub reviews: f64,
    #[serde(alias = "demandSupply")]
    pub demand_supply: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            distance: 0.28,
            grading: 0.22,
            pricing: 0.18,
            availability: 0.10,
            reviews: 0.12,
            demand_supply: 0.10,
        }
    }
}

impl RankingWeights {
    pub fn sum(&self) -> f64 {
        self.distance
            + self.grading
            + self.pricing
            + self.availability
            + self.reviews
            + self.demand_supply
    }
}

/// Caller-supplied weights; unset keys keep the base value
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightOverrides {
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub grading: Option<f64>,
    #[serde(default)]
    pub pricing: Option<f64>,
    #[serde(default)]
    pub availability: Option<f64>,
    #[serde(default)]
    pub reviews: Option<f64>,
    #[serde(default, alias = "demandSupply")]
    pub demand_supply: Option<f64>,
}

impl WeightOverrides {
    pub fn apply_to(&self, base: RankingWeights) -> RankingWeights {
        RankingWeights {
            distance: self.distance.unwrap_or(base.distance),
            grading: self.grading.unwrap_or(base.grading),
            pricing: self.pricing.unwrap_or(base.pricing),
            availability: self.availability.unwrap_or(base.availability),
            reviews: self.reviews.unwrap_or(base.reviews),
            demand_supply: self.demand_supply.unwrap_or(base.demand_supply),
        }
    }
}

/// Normalized sub-scores behind a composite score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub distance_score: f64,
    pub grading_score: f64,
    pub pricing_score: f64,
    pub availability_score: f64,
    pub reviews_score: f64,
    pub demand_score: f64,
    pub supply_score: f64,
    pub demand_supply_score: f64,
}

/// Enriched candidate with its composite score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record: CandidateRecord,
    pub score: f64,
    pub score_breakdown: ScoreBreakdown,
}

/// Tunable constants of the pricing model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    #[serde(alias = "demandWeight")]
    pub demand_weight: f64,
    #[serde(alias = "supplyWeight")]
    pub supply_weight: f64,
    #[serde(alias = "minMultiplier")]
    pub min_multiplier: f64,
    #[serde(alias = "maxMultiplier")]
    pub max_multiplier: f64,
    #[serde(alias = "gradeMinMultiplier")]
    pub grade_min_multiplier: f64,
    #[serde(alias = "gradeMaxMultiplier")]
    pub grade_max_multiplier: f64,
    #[serde(alias = "baseSpreadPct")]
    pub base_spread_pct: f64,
    #[serde(alias = "maxExtraSpreadPct")]
    pub max_extra_spread_pct: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            demand_weight: 0.6,
            supply_weight: 0.4,
            min_multiplier: 0.85,
            max_multiplier: 1.25,
            grade_min_multiplier: 0.90,
            grade_max_multiplier: 1.10,
            base_spread_pct: 0.08,
            max_extra_spread_pct: 0.12,
        }
    }
}

/// Input to the pricing engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequest {
    /// Reference market price per unit; anything not finite and positive
    /// yields the zero recommendation
    #[serde(default)]
    pub base_market_price: f64,
    #[serde(default)]
    pub grade: Option<f64>,
    #[serde(default)]
    pub demand_index: Option<f64>,
    #[serde(default)]
    pub supply_index: Option<f64>,
}

/// Recommended price with its band
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRecommendation {
    pub recommended_price: f64,
    pub low: f64,
    pub high: f64,
    pub multiplier: f64,
    pub confidence: f64,
}

impl PricingRecommendation {
    /// Returned for an unusable base price
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Keep a value only when it is a finite number
#[inline]
pub fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
