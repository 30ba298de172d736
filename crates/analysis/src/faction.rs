use crate::config::MissionControlConfig;
use crate::councilor::org_effects;
use crate::habitat::HabitatSummary;
use serde::Serialize;
use strategist_effects::{EffectBag, EffectGroup};
use strategist_model::{Faction, FactionId, World};
use strategist_templates::TemplateCatalog;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionControl {
    pub base: f64,
    pub masked_projects: usize,
    /// `base × decay^masked_projects`
    pub limit: f64,
    pub usage: f64,
    pub capacity: f64,
    /// `floor(usage × limit)`
    pub hate_floor: f64,
    /// `alien_war_numerator / limit`
    pub alien_war_ceiling: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactionSummary {
    pub id: FactionId,
    pub display_name: String,
    pub is_ai: bool,
    pub mission_control: MissionControl,
    /// Income and cost keys only
    pub monthly_income: EffectBag,
}

#[must_use]
pub fn mission_control(
    faction: &Faction,
    difficulty: &str,
    config: &MissionControlConfig,
) -> MissionControl {
    let base = config.base_for(difficulty);
    let masked_projects = config
        .masking_projects
        .iter()
        .filter(|p| faction.completed_projects.contains(p.as_str()))
        .count();
    let exponent = i32::try_from(masked_projects).unwrap_or(i32::MAX);
    let limit = base * config.masking_decay.powi(exponent);
    let usage = faction.mission_control_usage;
    let alien_war_ceiling = if limit > 0.0 {
        config.alien_war_numerator / limit
    } else {
        0.0
    };
    MissionControl {
        base,
        masked_projects,
        limit,
        usage,
        capacity: faction.mission_control_capacity,
        hate_floor: (usage * limit).floor(),
        alien_war_ceiling,
    }
}

fn income_only(bag: &EffectBag) -> EffectBag {
    let mut out = EffectBag::new();
    for (key, value) in bag.scalars() {
        if matches!(key.group(), EffectGroup::Income | EffectGroup::Cost) {
            out.set(key, value);
        }
    }
    out
}

/// Owned org effects plus the active effects of owned habitats
#[must_use]
pub fn summarize_faction(
    faction: &Faction,
    world: &World,
    catalog: &TemplateCatalog,
    habitats: &[HabitatSummary],
    config: &MissionControlConfig,
) -> FactionSummary {
    let from_orgs: EffectBag = world
        .owned_orgs(faction.id)
        .map(|org| org_effects(org, catalog))
        .sum();
    let from_habitats: EffectBag = habitats
        .iter()
        .filter(|h| h.faction == Some(faction.id))
        .map(|h| &h.active_effects)
        .sum();

    FactionSummary {
        id: faction.id,
        display_name: faction.display_name.clone(),
        is_ai: faction.is_ai,
        mission_control: mission_control(faction, &world.globals.difficulty, config),
        monthly_income: income_only(&from_orgs.combine(&from_habitats)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strategist_model::IntelTable;

    fn faction(usage: f64, completed: &[&str]) -> Faction {
        Faction {
            id: FactionId::new(1),
            template_name: "ResistCouncil".into(),
            display_name: "Resistance".into(),
            player: None,
            is_ai: false,
            councilors: Vec::new(),
            available_councilors: Vec::new(),
            mission_control_usage: usage,
            mission_control_capacity: 20.0,
            completed_projects: completed.iter().map(|p| p.to_string()).collect(),
            available_projects: Default::default(),
            project_progress: Default::default(),
            intel: IntelTable::default(),
        }
    }

    #[test]
    fn masking_projects_decay_the_limit() {
        let config = MissionControlConfig {
            masking_projects: vec!["Mask_A".into(), "Mask_B".into(), "Mask_C".into()],
            ..Default::default()
        };
        let masked = faction(10.0, &["Mask_A", "Mask_C", "Other"]);
        let mc = mission_control(&masked, "Veteran", &config);
        assert_eq!(mc.masked_projects, 2);
        assert!((mc.limit - 0.64).abs() < 1e-12);
        assert_eq!(mc.hate_floor, 6.0);
        assert!((mc.alien_war_ceiling - 50.0 / 0.64).abs() < 1e-9);
    }

    #[test]
    fn unmasked_limit_is_the_difficulty_base() {
        let mc = mission_control(&faction(3.0, &[]), "Brutal", &MissionControlConfig::default());
        assert_eq!(mc.limit, 0.75);
        assert_eq!(mc.hate_floor, 2.0);
    }
}
