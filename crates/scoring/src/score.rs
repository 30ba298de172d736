use crate::weights::ScoringWeights;
use serde::Serialize;
use strategist_effects::{EffectBag, EffectKey, MissionCounts};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreOptions {
    /// Skip the division by `tier^tier_exponent`
    pub ignore_tier: bool,
    /// Treat negative core attributes as zero (councilors)
    pub clamp_attributes: bool,
}

impl ScoreOptions {
    #[must_use]
    pub fn councilor() -> Self {
        Self {
            ignore_tier: false,
            clamp_attributes: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub value: f64,
    /// The total before mission rarity bonuses, tier-divided like `value`
    pub no_mission_score: f64,
    /// One line per contribution, in evaluation order
    pub details: Vec<String>,
}

fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded}")
}

/// Score an effect bag.
///
/// Evaluation order, mirrored by `details`: scalar stats in canonical key
/// order, tech bonuses, mission weights, mission rarity bonuses, and the tier
/// division last. The tier scalar is never weighted; it only drives the
/// division.
#[must_use]
pub fn score(
    bag: &EffectBag,
    weights: &ScoringWeights,
    rarity: &MissionCounts,
    options: ScoreOptions,
) -> Score {
    let mut total = 0.0;
    let mut details = Vec::new();

    for (key, raw) in bag.scalars() {
        if key == EffectKey::Tier {
            continue;
        }
        let weight = weights.stat(key);
        let value = if options.clamp_attributes && key.is_core_attribute() {
            raw.max(0.0)
        } else {
            raw
        };
        if weight == 0.0 || value == 0.0 {
            continue;
        }
        let contribution = value * weight;
        total += contribution;
        details.push(format!(
            "{}: {} × {} = {}",
            key.label(),
            num(value),
            num(weight),
            num(contribution)
        ));
    }

    for bonus in bag.tech_bonuses() {
        let weight = weights.tech(&bonus.category);
        if weight == 0.0 || bonus.bonus == 0.0 {
            continue;
        }
        let contribution = bonus.bonus * weight;
        total += contribution;
        details.push(format!(
            "{} research bonus: {} × {} = {}",
            bonus.category,
            num(bonus.bonus),
            num(weight),
            num(contribution)
        ));
    }

    for mission in bag.missions() {
        let weight = weights.mission(mission);
        if weight == 0.0 {
            continue;
        }
        total += weight;
        details.push(format!("Mission {mission}: +{}", num(weight)));
    }

    let mut no_mission_score = total;

    for mission in bag.missions() {
        match rarity.count(mission) {
            0 => {
                total += weights.missing_mission_bonus;
                details.push(format!(
                    "Mission {mission} is missing: +{}",
                    num(weights.missing_mission_bonus)
                ));
            }
            1 => {
                total += weights.single_mission_bonus;
                details.push(format!(
                    "Mission {mission} has a single source: +{}",
                    num(weights.single_mission_bonus)
                ));
            }
            _ => {}
        }
    }

    let tier = bag.get(EffectKey::Tier);
    if !options.ignore_tier && tier > 1.0 {
        let divisor = tier.powf(weights.tier_exponent);
        total /= divisor;
        no_mission_score /= divisor;
        details.push(format!(
            "Tier {}: ÷ {} = {}",
            num(tier),
            num(divisor),
            num(total)
        ));
    }

    Score {
        value: total,
        no_mission_score,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn weights() -> ScoringWeights {
        ScoringWeights::default()
    }

    #[test]
    fn details_follow_evaluation_order() {
        let mut bag = EffectBag::new()
            .with(EffectKey::Command, 2.0)
            .with(EffectKey::Persuasion, 5.0)
            .with(EffectKey::Tier, 2.0);
        bag.add_tech_bonus("Energy", 0.1);
        bag.grant_mission("Control");
        let weights = weights()
            .with_tech("Energy", 10.0)
            .with_mission("Control", 3.0);

        let score = score(&bag, &weights, &MissionCounts::new(), ScoreOptions::default());
        let prefixes: Vec<&str> = score
            .details
            .iter()
            .map(|line| line.split(':').next().unwrap_or_default())
            .collect();
        assert_eq!(
            prefixes,
            vec![
                "Persuasion",
                "Command",
                "Energy research bonus",
                "Mission Control",
                "Mission Control is missing",
                "Tier 2"
            ]
        );
        let raw_without_bonus = 5.0 + 2.0 + 1.0 + 3.0;
        let divisor = 2f64.powf(0.95);
        assert!((score.no_mission_score - raw_without_bonus / divisor).abs() < 1e-9);
        assert!((score.value - (raw_without_bonus + 5.0) / divisor).abs() < 1e-9);
    }

    #[test]
    fn tier_four_divides_by_the_exponentiated_tier() {
        let bag = EffectBag::new()
            .with(EffectKey::Science, 100.0)
            .with(EffectKey::Tier, 4.0);
        let counts = MissionCounts::new();

        let divided = score(&bag, &weights(), &counts, ScoreOptions::default());
        assert!((divided.value - 100.0 / 4f64.powf(0.95)).abs() < 1e-9);

        let ignored = score(
            &bag,
            &weights(),
            &counts,
            ScoreOptions {
                ignore_tier: true,
                ..ScoreOptions::default()
            },
        );
        assert_eq!(ignored.value, 100.0);

        let tier_one = bag.clone().with(EffectKey::Tier, 1.0);
        assert_eq!(score(&tier_one, &weights(), &counts, ScoreOptions::default()).value, 100.0);
    }

    #[test]
    fn rarity_bonus_depends_on_the_exact_count() {
        let mut bag = EffectBag::new();
        bag.grant_mission("Recruit");
        let weights = weights();
        let options = ScoreOptions::default();

        let none: MissionCounts = [("Other", 1)].into_iter().collect();
        let one: MissionCounts = [("Recruit", 1)].into_iter().collect();
        let two: MissionCounts = [("Recruit", 2)].into_iter().collect();

        assert_eq!(score(&bag, &weights, &none, options).value, 5.0);
        assert_eq!(score(&bag, &weights, &one, options).value, 2.0);
        assert_eq!(score(&bag, &weights, &two, options).value, 0.0);
        assert_eq!(score(&bag, &weights, &none, options).no_mission_score, 0.0);
    }

    #[test]
    fn clamping_touches_core_attributes_only() {
        let bag = EffectBag::new()
            .with(EffectKey::Persuasion, -3.0)
            .with(EffectKey::Loyalty, -2.0)
            .with(EffectKey::IncomeMoney, -4.0);
        let weights = weights()
            .with_stat(EffectKey::Loyalty, 1.0)
            .with_stat(EffectKey::IncomeMoney, 1.0);
        let counts = MissionCounts::new();

        let clamped = score(&bag, &weights, &counts, ScoreOptions::councilor());
        assert_eq!(clamped.value, -6.0);
        let raw = score(&bag, &weights, &counts, ScoreOptions::default());
        assert_eq!(raw.value, -9.0);
    }

    #[test]
    fn tier_is_never_weighted() {
        let bag = EffectBag::new().with(EffectKey::Tier, 3.0);
        let weights = weights().with_stat(EffectKey::Tier, 10.0);
        let score = score(
            &bag,
            &weights,
            &MissionCounts::new(),
            ScoreOptions {
                ignore_tier: true,
                clamp_attributes: false,
            },
        );
        assert_eq!(score.value, 0.0);
        assert!(score.details.is_empty());
    }
}
