// Model exports
pub mod domain;
pub mod listing;
pub mod requests;
pub mod responses;

pub use domain::{
    Availability, CandidateRecord, GeoPoint, MarketSignal, MarketSignals, PricingConfig,
    PricingRecommendation, PricingRequest, RankingOptions, RankingWeights, ScoreBreakdown,
    ScoredRecord, WeightOverrides,
};
pub use listing::{Listing, RankedListing, VendorSummary};
pub use requests::{PriceQuoteRequest, RankListingsRequest, RankRequest};
pub use responses::{Envelope, PriceQuote, RankListingsResponse, RankResponse};
