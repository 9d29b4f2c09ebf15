use serde::{Deserialize, Deserializer, Serialize};

use crate::models::domain::{
    finite, CandidateRecord, MarketSignals, PricingRequest, RankingOptions, WeightOverrides,
};
use crate::models::listing::Listing;

/// Request to rank a batch of candidates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankRequest {
    pub candidates: Vec<CandidateRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weights: WeightOverrides,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: RankingOptions,
}

/// Request to rank marketplace listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankListingsRequest {
    pub listings: Vec<Listing>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weights: WeightOverrides,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: RankingOptions,
}

/// Explicit `null` reads the same as an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Request for a listing price suggestion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuoteRequest {
    #[serde(default)]
    pub material_type: Option<String>,
    #[serde(default)]
    pub quantity_kg: Option<f64>,
    #[serde(default)]
    pub quality_grade: Option<f64>,
    #[serde(default)]
    pub base_market_price: f64,
    #[serde(default)]
    pub demand_index: Option<f64>,
    #[serde(default)]
    pub supply_index: Option<f64>,
}

impl PriceQuoteRequest {
    /// Build the pricing request, filling missing indices from the market
    /// signals recorded for the material.
    pub fn resolve(&self, signals: &MarketSignals) -> PricingRequest {
        let signal = self
            .material_type
            .as_deref()
            .and_then(|material| signals.get(material));

        PricingRequest {
            base_market_price: self.base_market_price,
            grade: self.quality_grade,
            demand_index: finite(self.demand_index)
                .or_else(|| signal.and_then(|s| finite(s.demand_index))),
            supply_index: finite(self.supply_index)
                .or_else(|| signal.and_then(|s| finite(s.supply_index))),
        }
    }
}
