use std::cmp::Ordering;

use tracing::{debug, trace};

use crate::core::distance;
use crate::core::normalize::{normalize, normalize_inverse, FieldRange};
use crate::core::round_to;
use crate::models::domain::finite;
use crate::models::{
    CandidateRecord, Listing, RankedListing, RankingOptions, RankingWeights, ScoreBreakdown,
    ScoredRecord, WeightOverrides,
};

/// Share of demand vs. supply inside the demand/supply sub-score
const DEMAND_SHARE: f64 = 0.6;
const SUPPLY_SHARE: f64 = 0.4;

/// Composite scores are reported with this many decimals
const SCORE_DECIMALS: i32 = 6;

/// Vendor ranking engine - implements the scoring pipeline
///
/// # Pipeline Stages
/// 1. Eligibility filter (availability threshold or boolean availability)
/// 2. Enrichment (distance, review alias, market signals)
/// 3. Per-batch range computation
/// 4. Weighted composite scoring
/// 5. Stable sort by score, descending
#[derive(Debug, Clone)]
pub struct Ranker {
    weights: RankingWeights,
}

impl Ranker {
    pub fn new(weights: RankingWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: RankingWeights::default(),
        }
    }

    pub fn weights(&self) -> &RankingWeights {
        &self.weights
    }

    /// Ranker using this one's weights with the caller's keys replaced
    pub fn with_overrides(&self, overrides: &WeightOverrides) -> Self {
        Self::new(overrides.apply_to(self.weights))
    }

    /// Rank a batch of candidates for a buyer.
    ///
    /// Candidates are never modified; each result carries a freshly built
    /// enriched record. Candidates with equal scores keep their input order.
    pub fn rank(&self, candidates: &[CandidateRecord], options: &RankingOptions) -> Vec<ScoredRecord> {
        self.rank_indexed(candidates, options)
            .into_iter()
            .map(|(_, scored)| scored)
            .collect()
    }

    /// Rank marketplace listings and attach the results to each listing
    pub fn rank_listings(&self, listings: &[Listing], options: &RankingOptions) -> Vec<RankedListing> {
        let candidates: Vec<CandidateRecord> =
            listings.iter().map(CandidateRecord::from_listing).collect();

        self.rank_indexed(&candidates, options)
            .into_iter()
            .map(|(index, scored)| RankedListing {
                listing: listings[index].clone(),
                vendor_score: scored.score,
                score_breakdown: scored.score_breakdown,
                distance_km: scored.record.distance_km,
            })
            .collect()
    }

    /// Ranked results paired with each candidate's position in the input
    fn rank_indexed(
        &self,
        candidates: &[CandidateRecord],
        options: &RankingOptions,
    ) -> Vec<(usize, ScoredRecord)> {
        // Stage 1: Eligibility, decided once for the whole batch
        let eligibility = Eligibility::for_batch(candidates, options.required_availability);

        // Stage 2: Enrichment
        let enriched: Vec<(usize, CandidateRecord)> = candidates
            .iter()
            .enumerate()
            .filter(|(_, candidate)| eligibility.admits(candidate))
            .map(|(index, candidate)| (index, enrich(candidate, options)))
            .collect();

        // Stage 3: Ranges over the surviving batch
        let ranges = BatchRanges::observe(enriched.iter().map(|(_, record)| record));

        // Stage 4: Scoring
        let mut scored: Vec<(usize, ScoredRecord)> = enriched
            .into_iter()
            .map(|(index, mut record)| {
                // Computed results replace any caller fields of the same name
                record.extra.remove("score");
                record.extra.remove("scoreBreakdown");

                let score_breakdown = ranges.score(&record);
                let score = round_to(composite_score(&self.weights, &score_breakdown), SCORE_DECIMALS);

                trace!(index, id = ?record.id, score, "scored candidate");

                (
                    index,
                    ScoredRecord {
                        record,
                        score,
                        score_breakdown,
                    },
                )
            })
            .collect();

        // Stage 5: `sort_by` is stable, so ties keep input order
        scored.sort_by(|(_, a), (_, b)| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        debug!(
            total = candidates.len(),
            eligible = scored.len(),
            eligibility = ?eligibility,
            "Ranked candidate batch"
        );

        scored
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Rank with the default weights overridden per key by `weights`
pub fn rank_candidates(
    candidates: &[CandidateRecord],
    weights: &WeightOverrides,
    options: &RankingOptions,
) -> Vec<ScoredRecord> {
    Ranker::with_default_weights()
        .with_overrides(weights)
        .rank(candidates, options)
}

/// Weighted sum of the six scored dimensions
pub fn composite_score(weights: &RankingWeights, breakdown: &ScoreBreakdown) -> f64 {
    breakdown.distance_score * weights.distance
        + breakdown.grading_score * weights.grading
        + breakdown.pricing_score * weights.pricing
        + breakdown.availability_score * weights.availability
        + breakdown.reviews_score * weights.reviews
        + breakdown.demand_supply_score * weights.demand_supply
}

/// Batch-wide eligibility rule
#[derive(Debug, Clone, Copy, PartialEq)]
enum Eligibility {
    /// Numeric availability at or above the threshold
    MinimumLevel(f64),
    /// Some candidate has a boolean availability: only `true` passes
    AvailableFlag,
    All,
}

impl Eligibility {
    fn for_batch(candidates: &[CandidateRecord], required_availability: Option<f64>) -> Self {
        if let Some(required) = finite(required_availability) {
            return Eligibility::MinimumLevel(required);
        }

        if candidates.iter().any(|c| c.availability_flag().is_some()) {
            Eligibility::AvailableFlag
        } else {
            Eligibility::All
        }
    }

    fn admits(&self, candidate: &CandidateRecord) -> bool {
        match self {
            Eligibility::MinimumLevel(required) => candidate
                .availability_level()
                .is_some_and(|level| level >= *required),
            Eligibility::AvailableFlag => candidate.availability_flag() == Some(true),
            Eligibility::All => true,
        }
    }
}

/// Resolve the derived fields of a candidate into a new record
fn enrich(candidate: &CandidateRecord, options: &RankingOptions) -> CandidateRecord {
    let distance_km = finite(candidate.distance_km).or_else(|| {
        distance::distance_km(
            options.buyer_location.as_ref(),
            candidate.location_point().as_ref(),
        )
    });

    let material_type = candidate.resolved_material_type().map(str::to_owned);
    let signal = material_type
        .as_deref()
        .and_then(|material| options.market_signals.as_ref()?.get(material));

    let demand_index = finite(candidate.demand_index)
        .or_else(|| signal.and_then(|s| finite(s.demand_index)));
    let supply_index = finite(candidate.supply_index)
        .or_else(|| signal.and_then(|s| finite(s.supply_index)));

    CandidateRecord {
        distance_km,
        review_rating: candidate.resolved_review_rating(),
        material_type,
        demand_index,
        supply_index,
        ..candidate.clone()
    }
}

/// Observed ranges of every scored field in one batch
#[derive(Debug, Clone, Copy)]
struct BatchRanges {
    distance: FieldRange,
    grading: FieldRange,
    pricing: FieldRange,
    availability: FieldRange,
    reviews: FieldRange,
    demand: FieldRange,
    supply: FieldRange,
}

impl BatchRanges {
    fn observe<'a, I>(records: I) -> Self
    where
        I: Iterator<Item = &'a CandidateRecord> + Clone,
    {
        Self {
            distance: FieldRange::observe(records.clone().map(|r| r.distance_km)),
            grading: FieldRange::observe(records.clone().map(|r| r.grading)),
            pricing: FieldRange::observe(records.clone().map(|r| r.pricing)),
            availability: FieldRange::observe(records.clone().map(|r| r.availability_level())),
            reviews: FieldRange::observe(records.clone().map(|r| r.review_rating)),
            demand: FieldRange::observe(records.clone().map(|r| r.demand_index)),
            supply: FieldRange::observe(records.map(|r| r.supply_index)),
        }
    }

    fn score(&self, record: &CandidateRecord) -> ScoreBreakdown {
        let availability_score = match record.availability_flag() {
            Some(true) => 1.0,
            Some(false) => 0.0,
            None => normalize(
                record.availability_level(),
                self.availability.min,
                self.availability.max,
            ),
        };

        let demand_score = normalize(record.demand_index, self.demand.min, self.demand.max);
        let supply_score = normalize_inverse(record.supply_index, self.supply.min, self.supply.max);

        ScoreBreakdown {
            distance_score: normalize_inverse(record.distance_km, self.distance.min, self.distance.max),
            grading_score: normalize(record.grading, self.grading.min, self.grading.max),
            pricing_score: normalize_inverse(record.pricing, self.pricing.min, self.pricing.max),
            availability_score,
            reviews_score: normalize(record.review_rating, self.reviews.min, self.reviews.max),
            demand_score,
            supply_score,
            demand_supply_score: demand_score * DEMAND_SHARE + supply_score * SUPPLY_SHARE,
        }
    }
}
