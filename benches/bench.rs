// Criterion benchmarks for Market Algo

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use market_algo::core::{distance::haversine_distance, PriceRecommender, Ranker};
use market_algo::models::{
    Availability, CandidateRecord, GeoPoint, MarketSignal, MarketSignals, PricingRequest,
    RankingOptions,
};

fn create_candidate(id: usize, lat: f64, lng: f64) -> CandidateRecord {
    CandidateRecord {
        id: Some(id.to_string()),
        location: Some(GeoPoint::new(lat, lng)),
        grading: Some(1.0 + (id % 5) as f64),
        pricing: Some(10.0 + (id % 13) as f64 * 0.75),
        availability: Some(Availability::Level(50.0 + (id % 40) as f64)),
        review_rating: Some(2.5 + (id % 6) as f64 * 0.5),
        material_type: Some(if id % 2 == 0 { "plastic" } else { "paper" }.to_string()),
        ..Default::default()
    }
}

fn create_options() -> RankingOptions {
    let mut signals = MarketSignals::new();
    signals.insert(
        "plastic".to_string(),
        MarketSignal {
            demand_index: Some(0.7),
            supply_index: Some(0.3),
        },
    );
    signals.insert(
        "paper".to_string(),
        MarketSignal {
            demand_index: Some(0.4),
            supply_index: Some(0.6),
        },
    );

    RankingOptions {
        required_availability: Some(60.0),
        buyer_location: Some(GeoPoint::new(28.6139, 77.2090)),
        market_signals: Some(signals),
    }
}

fn bench_haversine_distance(c: &mut Criterion) {
    c.bench_function("haversine_distance", |b| {
        b.iter(|| {
            haversine_distance(
                black_box(28.6139),
                black_box(77.2090),
                black_box(19.0760),
                black_box(72.8777),
            )
        });
    });
}

fn bench_ranking(c: &mut Criterion) {
    let ranker = Ranker::with_default_weights();
    let options = create_options();

    let mut group = c.benchmark_group("ranking");

    for candidate_count in [10, 50, 100, 500, 1000].iter() {
        let candidates: Vec<CandidateRecord> = (0..*candidate_count)
            .map(|i| {
                let lat_offset = (i as f64 * 0.001) % 0.5;
                let lng_offset = (i as f64 * 0.0007) % 0.5;
                create_candidate(i, 28.6139 + lat_offset, 77.2090 + lng_offset)
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::new("rank", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| ranker.rank(black_box(&candidates), black_box(&options)));
            },
        );
    }

    group.finish();
}

fn bench_pricing(c: &mut Criterion) {
    let recommender = PriceRecommender::with_default_config();
    let request = PricingRequest {
        base_market_price: 42.0,
        grade: Some(4.0),
        demand_index: Some(0.65),
        supply_index: None,
    };

    c.bench_function("recommend_price", |b| {
        b.iter(|| recommender.recommend(black_box(&request)));
    });
}

criterion_group!(benches, bench_haversine_distance, bench_ranking, bench_pricing);

criterion_main!(benches);
