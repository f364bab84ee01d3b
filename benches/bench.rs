// Criterion benchmarks for Channel Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use channel_match::core::{extract, ActivitySnapshot, Matcher, NoHistory};
use channel_match::models::{Channel, ChannelActivity, Offer, PlacementSummary};

const DESCRIPTIONS: [&str; 4] = [
    "Обзоры: технология и гаджеты",
    "Бизнес, маркетинг и продажи",
    "Рецепты и кулинария каждый день",
    "Мемы, кино и музыка",
];

fn create_channel(id: usize) -> Channel {
    Channel {
        id: id as i64,
        owner_id: 1_000 + id as i64,
        username: Some(format!("channel_{}", id)),
        title: format!("Channel {}", id),
        description: Some(DESCRIPTIONS[id % DESCRIPTIONS.len()].to_string()),
        category: None,
        subscriber_count: 500 + (id as u64 * 1_373) % 200_000,
        price_per_post: 300.0 + (id % 40) as f64 * 150.0,
        engagement_rate: (id % 12) as f64,
        is_verified: id % 3 == 0,
    }
}

fn create_offer() -> Offer {
    Offer {
        id: 1,
        created_by: 42,
        title: "Launch campaign".to_string(),
        category: Some("tech".to_string()),
        budget: 15_000.0,
        target_audience: None,
        created_at: None,
    }
}

fn create_snapshot(count: usize) -> ActivitySnapshot {
    (0..count)
        .map(|id| {
            let activity = ChannelActivity {
                history: Some(PlacementSummary {
                    count: (id % 6) as u32,
                    average_rating: (id % 6 != 0).then(|| 1.0 + (id % 5) as f64),
                    good_count: (id % 3) as u32,
                }),
                recent_placements: Some((id % 8) as u32),
            };
            (id as i64, activity)
        })
        .collect()
}

fn bench_feature_extraction(c: &mut Criterion) {
    let offer = create_offer();
    let channel = create_channel(7);

    c.bench_function("extract_features", |b| {
        b.iter(|| extract(black_box(&offer), black_box(&channel), &NoHistory));
    });
}

fn bench_ranking(c: &mut Criterion) {
    let matcher = Matcher::with_default_weights();
    let offer = create_offer();

    let mut group = c.benchmark_group("ranking");

    for candidate_count in [10, 50, 200, 1000].iter() {
        let channels: Vec<Channel> = (0..*candidate_count).map(create_channel).collect();
        let snapshot = create_snapshot(*candidate_count);

        group.bench_with_input(
            BenchmarkId::new("rank_channels_for_offer", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| {
                    matcher.rank_channels_for_offer(
                        black_box(&offer),
                        black_box(channels.clone()),
                        &snapshot,
                        black_box(20),
                    )
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_feature_extraction, bench_ranking);

criterion_main!(benches);
