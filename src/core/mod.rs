// Core algorithm exports
pub mod distance;
pub mod normalize;
pub mod pricing;
pub mod ranking;

pub use distance::{distance_km, haversine_distance};
pub use normalize::{normalize, normalize_inverse, FieldRange};
pub use pricing::{
    demand_supply_multiplier, grade_multiplier, normalize_grade, recommend_price, PriceRecommender,
};
pub use ranking::{composite_score, rank_candidates, Ranker};

/// Round to `decimals` places the way a fixed-point decimal rendering does
///
/// The exact binary value is rounded, so `1.115` (stored just below the
/// half) becomes `1.11`. Exact binary ties such as `0.125` round away from
/// zero.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() || value.abs() >= 1e21 {
        return value;
    }
    let places = decimals.max(0);

    // value * 2^(places + 1) is an odd integer exactly when value sits on a tie
    let halves = value * 2f64.powi(places + 1);
    let text = if halves.fract() == 0.0 && halves % 2.0 != 0.0 {
        format!("{:.*}", places as usize + 1, value.abs())
            .replace('.', "")
            .parse::<u128>()
            .ok()
            .map(|units| format!("{}e-{}", (units + 5) / 10, places))
    } else {
        Some(format!("{:.*}", places as usize, value.abs()))
    };

    text.and_then(|text| text.parse::<f64>().ok())
        .map(|magnitude| magnitude.copysign(value))
        .unwrap_or(value)
}
