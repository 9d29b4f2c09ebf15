use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::{PricingRecommendation, ScoredRecord};
use crate::models::listing::RankedListing;

/// Ranked candidates
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankResponse {
    pub results: Vec<ScoredRecord>,
    pub total_candidates: usize,
    pub eligible_candidates: usize,
}

/// Ranked listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankListingsResponse {
    pub listings: Vec<RankedListing>,
}

/// Price suggestion echoed with the listing context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuote {
    pub material_type: Option<String>,
    pub quantity_kg: Option<f64>,
    pub quality_grade: Option<f64>,
    pub recommendation: PricingRecommendation,
}

/// Output wrapper stamped with the run id and generation time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub run_id: Uuid,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Envelope<T> {
    pub fn new(run_id: Uuid, body: T) -> Self {
        Self {
            run_id,
            generated_at: chrono::Utc::now(),
            body,
        }
    }
}
