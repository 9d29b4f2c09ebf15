//! Market Algo - vendor ranking and price recommendation for the recyclables marketplace
//!
//! This library ranks candidate vendors/listings for a buyer by a weighted
//! composite of distance, grade, price, availability, reviews and live
//! demand/supply, and recommends a fair price band for a material.
//! Both engines are pure, synchronous computations over in-memory values.

pub mod config;
pub mod core;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use crate::core::{haversine_distance, recommend_price, rank_candidates, PriceRecommender, Ranker};
pub use crate::models::{
    CandidateRecord, GeoPoint, PricingConfig, PricingRecommendation, PricingRequest,
    RankingOptions, RankingWeights, ScoredRecord,
};
