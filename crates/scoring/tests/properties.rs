use proptest::prelude::*;
use strategist_effects::{EffectBag, EffectKey, MissionCounts};
use strategist_scoring::{score, ScoreOptions, ScoringWeights};

fn scored_keys() -> Vec<EffectKey> {
    EffectKey::ALL
        .iter()
        .copied()
        .filter(|key| *key != EffectKey::Tier)
        .collect()
}

fn bag_strategy() -> impl Strategy<Value = EffectBag> {
    let keys = scored_keys();
    (
        prop::collection::vec((0..keys.len(), -20i32..20), 0..8),
        1i32..6,
    )
        .prop_map(move |(scalars, tier)| {
            let mut bag = EffectBag::new();
            for (idx, value) in scalars {
                bag.add(keys[idx], f64::from(value));
            }
            bag.set(EffectKey::Tier, f64::from(tier));
            bag
        })
}

fn weights_strategy() -> impl Strategy<Value = ScoringWeights> {
    let keys = scored_keys();
    prop::collection::vec((0..keys.len(), 0i32..5), 0..10).prop_map(move |entries| {
        let mut weights = ScoringWeights::default();
        for (idx, weight) in entries {
            weights.stats.insert(keys[idx], f64::from(weight));
        }
        weights
    })
}

proptest! {
    #[test]
    fn raising_a_positively_weighted_stat_raises_the_score(
        bag in bag_strategy(),
        weights in weights_strategy(),
        key_idx in 0usize..7,
        delta in 1i32..10,
    ) {
        let key = EffectKey::CORE_ATTRIBUTES[key_idx];
        let weights = weights.with_stat(key, 2.0);
        let counts = MissionCounts::new();
        let before = score(&bag, &weights, &counts, ScoreOptions::default());
        let mut raised = bag.clone();
        raised.add(key, f64::from(delta));
        let after = score(&raised, &weights, &counts, ScoreOptions::default());
        prop_assert!(after.value > before.value);
    }

    #[test]
    fn zero_weight_keys_do_not_matter(
        bag in bag_strategy(),
        key_idx in 0usize..24,
        value in -50i32..50,
    ) {
        let keys = scored_keys();
        let key = keys[key_idx % keys.len()];
        let weights = ScoringWeights::default().with_stat(key, 0.0);
        let counts = MissionCounts::new();
        let mut changed = bag.clone();
        changed.set(key, f64::from(value));
        prop_assert_eq!(
            score(&bag, &weights, &counts, ScoreOptions::default()).value,
            score(&changed, &weights, &counts, ScoreOptions::default()).value
        );
    }
}

#[test]
fn raw_total_of_one_hundred_at_tier_four() {
    let bag = EffectBag::new()
        .with(EffectKey::Persuasion, 60.0)
        .with(EffectKey::Command, 40.0)
        .with(EffectKey::Tier, 4.0);
    let result = score(
        &bag,
        &ScoringWeights::default(),
        &MissionCounts::new(),
        ScoreOptions::default(),
    );
    let expected = 100.0 / 4f64.powf(0.95);
    assert!((result.value - expected).abs() < 1e-9);
    assert!((result.no_mission_score - expected).abs() < 1e-9);
    assert!(result.details.last().is_some_and(|line| line.starts_with("Tier 4")));
}
