use serde::Serialize;
use strategist_analysis::Analysis;
use strategist_effects::EffectBag;
use strategist_model::FactionId;
use strategist_scoring::{rank, score, Ranked, ScoreOptions, ScoringWeights};

/// How a ranked candidate relates to the player faction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Owned,
    Available,
    Visible,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: u64,
    pub display_name: String,
    pub faction: Option<FactionId>,
    pub relation: Relation,
}

/// Player councilors are scored with their orgs; everyone else without,
/// since orgs stay with their faction.
pub fn rank_councilors(
    analysis: &Analysis,
    weights: &ScoringWeights,
    ignore_tier: bool,
) -> Vec<Ranked<Candidate>> {
    let player = analysis.player.id;
    let options = ScoreOptions {
        ignore_tier,
        ..ScoreOptions::councilor()
    };
    let entries = analysis.councilors.iter().map(|c| {
        let relation = if c.faction == Some(player) {
            Relation::Owned
        } else if analysis.interest.available_councilors.contains(&c.id) {
            Relation::Available
        } else {
            Relation::Visible
        };
        let bag = if relation == Relation::Owned {
            &c.effects_with_orgs_and_augments
        } else {
            &c.effects_with_augments
        };
        let candidate = Candidate {
            id: c.id.get(),
            display_name: c.display_name.clone(),
            faction: c.faction,
            relation,
        };
        (candidate, bag)
    });

    rank_bags(entries, analysis, weights, options)
}

pub fn rank_orgs(
    analysis: &Analysis,
    weights: &ScoringWeights,
    ignore_tier: bool,
) -> Vec<Ranked<Candidate>> {
    let player = analysis.player.id;
    let options = ScoreOptions {
        ignore_tier,
        clamp_attributes: false,
    };
    let entries = analysis.orgs.iter().map(|org| {
        let relation = match org.faction {
            Some(owner) if owner == player => Relation::Owned,
            Some(_) => Relation::Visible,
            None => Relation::Available,
        };
        let candidate = Candidate {
            id: org.id.get(),
            display_name: org.display_name.clone(),
            faction: org.faction,
            relation,
        };
        (candidate, &org.effects)
    });
    rank_bags(entries, analysis, weights, options)
}

fn rank_bags<'a>(
    entries: impl Iterator<Item = (Candidate, &'a EffectBag)>,
    analysis: &Analysis,
    weights: &ScoringWeights,
    options: ScoreOptions,
) -> Vec<Ranked<Candidate>> {
    rank(entries, |(_, bag)| score(bag, weights, &analysis.mission_counts, options))
        .into_iter()
        .map(|ranked| Ranked {
            rank: ranked.rank,
            item: ranked.item.0,
            score: ranked.score,
        })
        .collect()
}
