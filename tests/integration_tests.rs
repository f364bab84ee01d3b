// Integration tests for Channel Match

use channel_match::core::{ActivitySnapshot, Matcher, NoHistory, PlacementHistory};
use channel_match::models::{
    Channel, ChannelActivity, Offer, PlacementSummary, ScoringWeights,
};

fn create_test_offer(id: i64, category: &str, budget: f64) -> Offer {
    Offer {
        id,
        created_by: 500,
        title: format!("Offer {}", id),
        category: Some(category.to_string()),
        budget,
        target_audience: None,
        created_at: None,
    }
}

fn create_test_channel(id: i64, description: &str, price: f64, subscribers: u64) -> Channel {
    Channel {
        id,
        owner_id: 100 + id,
        username: Some(format!("channel_{}", id)),
        title: format!("Channel {}", id),
        description: Some(description.to_string()),
        category: None,
        subscriber_count: subscribers,
        price_per_post: price,
        engagement_rate: 4.0,
        is_verified: false,
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_integration_end_to_end_scoring() {
    let matcher = Matcher::with_default_weights();
    let offer = create_test_offer(1, "tech", 10_000.0);
    let mut channel = create_test_channel(7, "Обзоры: технология и наука", 2_000.0, 15_000);
    channel.is_verified = true;

    let ranked = matcher.score_pair(&offer, &channel, &NoHistory);
    let features = ranked.breakdown.features;

    assert!(approx(features.category, 0.2));
    assert_eq!(features.budget, 1.0);
    assert!(approx(features.audience, 0.8));
    assert_eq!(features.historical, 0.5);
    assert_eq!(features.availability, 1.0);

    // 0.2*0.30 + 1.0*0.25 + 0.8*0.20 + 0.5*0.15 + 1.0*0.10
    assert!(approx(ranked.score(), 0.645));
    assert!(approx(ranked.estimated_roi, 1.5 + 2.0 * 0.645));
    assert_eq!(ranked.estimated_reach, 6_000);
    assert_eq!(ranked.explanation, "optimal price/reach ratio");
    assert_eq!(ranked.candidate.id, 7);
}

#[test]
fn test_integration_ranking_uses_placement_history() {
    let matcher = Matcher::with_default_weights();
    let offer = create_test_offer(1, "business", 20_000.0);

    let channels = vec![
        create_test_channel(1, "бизнес и инвестиции", 3_000.0, 30_000),
        create_test_channel(2, "бизнес и инвестиции", 3_000.0, 30_000),
        create_test_channel(3, "бизнес и инвестиции", 3_000.0, 30_000),
    ];

    let snapshot: ActivitySnapshot = [
        (
            1,
            ChannelActivity {
                history: Some(PlacementSummary {
                    count: 5,
                    average_rating: Some(2.0),
                    good_count: 0,
                }),
                recent_placements: Some(7),
            },
        ),
        (
            2,
            ChannelActivity {
                history: Some(PlacementSummary {
                    count: 5,
                    average_rating: Some(5.0),
                    good_count: 5,
                }),
                recent_placements: Some(0),
            },
        ),
        (
            3,
            ChannelActivity {
                history: Some(PlacementSummary::default()),
                recent_placements: Some(0),
            },
        ),
    ]
    .into_iter()
    .collect();

    let result = matcher.rank_channels_for_offer(&offer, channels, &snapshot, 10);
    let ids: Vec<i64> = result.candidates.iter().map(|c| c.candidate.id).collect();

    assert_eq!(result.total_candidates, 3);
    assert_eq!(ids, vec![2, 3, 1]);

    let best = &result.candidates[0];
    assert_eq!(best.breakdown.features.historical, 1.0);
    // rated 5/5 on average
    assert!(approx(best.estimated_roi, (1.5 + 2.0 * best.score()) * 5.0 / 3.0));

    let busiest = &result.candidates[2];
    assert_eq!(busiest.breakdown.features.availability, 0.3);
}

#[test]
fn test_integration_threshold_and_stable_order() {
    let matcher = Matcher::with_default_weights().with_min_score(0.5);
    let offer = create_test_offer(1, "food", 10_000.0);

    let mut weak = create_test_channel(4, "", 9_000.0, 100);
    weak.engagement_rate = 0.1;

    let channels = vec![
        create_test_channel(1, "рецепты и кулинария", 1_000.0, 8_000),
        weak,
        create_test_channel(2, "рецепты и кулинария", 1_000.0, 8_000),
        create_test_channel(3, "рецепты и кулинария", 1_000.0, 8_000),
    ];

    let result = matcher.rank_channels_for_offer(&offer, channels, &NoHistory, 10);
    let ids: Vec<i64> = result.candidates.iter().map(|c| c.candidate.id).collect();

    assert_eq!(result.total_candidates, 4);
    assert_eq!(ids, vec![1, 2, 3]);
    assert!(result.candidates.iter().all(|c| c.score() > 0.5));
}

#[test]
fn test_integration_limit_truncates_after_sorting() {
    let matcher = Matcher::with_default_weights();
    let offer = create_test_offer(1, "tech", 10_000.0);

    let channels: Vec<Channel> = (1..=30)
        .map(|i| create_test_channel(i, "технология", 500.0 + i as f64 * 100.0, i as u64 * 1_000))
        .collect();

    let all = matcher.rank_channels_for_offer(&offer, channels.clone(), &NoHistory, 50);
    let top = matcher.rank_channels_for_offer(&offer, channels, &NoHistory, 5);

    assert_eq!(top.candidates.len(), 5);
    for (a, b) in top.candidates.iter().zip(all.candidates.iter()) {
        assert_eq!(a.candidate.id, b.candidate.id);
    }
    for pair in all.candidates.windows(2) {
        assert!(pair[0].score() >= pair[1].score());
    }
}

#[test]
fn test_integration_offers_for_channel_is_symmetric() {
    let matcher = Matcher::with_default_weights();
    let channel = create_test_channel(9, "путешествия и туризм", 2_000.0, 12_000);
    let offers = vec![
        create_test_offer(1, "travel", 10_000.0),
        create_test_offer(2, "crypto", 10_000.0),
        create_test_offer(3, "travel", 1_000.0),
    ];

    let result = matcher.rank_offers_for_channel(&channel, offers.clone(), &NoHistory, 10);

    for ranked in &result.candidates {
        let direct = matcher.score_pair(&ranked.candidate, &channel, &NoHistory);
        assert!(approx(ranked.score(), direct.score()));
    }
    assert_eq!(result.candidates[0].candidate.id, 1);
    assert_eq!(result.total_candidates, offers.len());
}

#[test]
fn test_integration_lookup_failures_are_neutral() {
    struct Offline;

    impl PlacementHistory for Offline {
        fn summary(
            &self,
            channel_id: i64,
        ) -> Result<PlacementSummary, channel_match::core::LookupError> {
            Err(channel_match::core::LookupError::Missing(channel_id))
        }

        fn recent_placements(&self, channel_id: i64) -> Result<u32, channel_match::core::LookupError> {
            Err(channel_match::core::LookupError::Missing(channel_id))
        }
    }

    let matcher = Matcher::new(ScoringWeights::default());
    let offer = create_test_offer(1, "tech", 10_000.0);
    let channel = create_test_channel(1, "технология", 1_000.0, 5_000);

    let ranked = matcher.score_pair(&offer, &channel, &Offline);
    assert_eq!(ranked.breakdown.features.historical, 0.5);
    assert_eq!(ranked.breakdown.features.availability, 0.7);

    // a snapshot that never saw the channel behaves the same way
    let empty = ActivitySnapshot::new();
    let from_snapshot = matcher.score_pair(&offer, &channel, &empty);
    assert!(approx(ranked.score(), from_snapshot.score()));
}
