// Unit tests for Market Algo

use geo::{point, HaversineDistance};
use market_algo::config::Settings;
use market_algo::core::{
    distance::{distance_km, haversine_distance},
    normalize::{normalize, normalize_inverse, FieldRange},
    pricing::{demand_supply_multiplier, grade_multiplier, normalize_grade},
};
use market_algo::models::{GeoPoint, PricingConfig};

#[test]
fn test_haversine_distance_zero() {
    let distance = haversine_distance(28.6139, 77.2090, 28.6139, 77.2090);
    assert!(distance < 0.01);
}

#[test]
fn test_haversine_distance_delhi_to_mumbai() {
    let distance = haversine_distance(28.6139, 77.2090, 19.0760, 72.8777);
    assert!(distance > 1140.0 && distance < 1165.0, "got {}", distance);
    assert!((distance - 1148.09).abs() < 0.1, "got {}", distance);
}

#[test]
fn test_haversine_matches_geo_crate() {
    let pairs = [
        ((28.6139, 77.2090), (19.0760, 72.8777)),
        ((12.9716, 77.5946), (13.0827, 80.2707)),
        ((51.5074, -0.1278), (48.8566, 2.3522)),
    ];

    for ((lat1, lon1), (lat2, lon2)) in pairs {
        let ours = haversine_distance(lat1, lon1, lat2, lon2);
        let theirs = point!(x: lon1, y: lat1).haversine_distance(&point!(x: lon2, y: lat2)) / 1000.0;
        assert!((ours - theirs).abs() < 1.0, "ours {} vs geo {}", ours, theirs);
    }
}

#[test]
fn test_distance_unknown_without_buyer() {
    let vendor = GeoPoint::new(19.0760, 72.8777);
    assert_eq!(distance_km(None, Some(&vendor)), None);
}

#[test]
fn test_normalization_bounds() {
    let (min, max) = (2.0, 12.0);
    for v in [2.0, 3.3, 7.0, 11.9, 12.0] {
        let direct = normalize(Some(v), min, max);
        let inverse = normalize_inverse(Some(v), min, max);
        assert!((0.0..=1.0).contains(&direct));
        assert!((0.0..=1.0).contains(&inverse));
        assert!((direct + inverse - 1.0).abs() < 1e-12);
    }
}

#[test]
fn test_field_range_from_batch() {
    let range = FieldRange::observe([Some(18.0), Some(22.5), None, Some(15.0)]);
    assert_eq!(range.min, 15.0);
    assert_eq!(range.max, 22.5);
    assert_eq!(normalize_inverse(Some(15.0), range.min, range.max), 1.0);
}

#[test]
fn test_grade_scales() {
    assert_eq!(normalize_grade(Some(0.8)), 0.8);
    assert_eq!(normalize_grade(Some(5.0)), 1.0);
    assert_eq!(normalize_grade(Some(100.0)), 0.5);

    let config = PricingConfig::default();
    assert!((grade_multiplier(None, &config) - 1.0).abs() < 1e-12);
}

#[test]
fn test_demand_supply_multiplier_range() {
    let config = PricingConfig::default();
    for d in [0.0, 0.25, 0.5, 0.75, 1.0] {
        for s in [0.0, 0.5, 1.0] {
            let m = demand_supply_multiplier(d, s, &config);
            assert!(m >= config.min_multiplier && m <= config.max_multiplier);
        }
    }
}

#[test]
fn test_shipped_config_parses() {
    let settings: Settings = toml::from_str(include_str!("../config/default.toml")).unwrap();
    assert_eq!(settings.ranking.weights.distance, 0.28);
    assert_eq!(settings.pricing.max_extra_spread_pct, 0.12);
    assert!(settings.market_signals.contains_key("plastic"));
    assert_eq!(settings.logging.format, "json");
}
