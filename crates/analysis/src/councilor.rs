use serde::Serialize;
use strategist_effects::{EffectBag, EffectKey};
use strategist_model::{Councilor, CouncilorId, FactionId, Org, OrgId, World};
use strategist_templates::types::{StatOperation, TraitTemplate};
use strategist_templates::TemplateCatalog;

/// Three cumulative views of a councilor's effects
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouncilorEffects {
    pub id: CouncilorId,
    pub display_name: String,
    pub type_template: String,
    pub faction: Option<FactionId>,
    pub traits: Vec<String>,
    pub orgs: Vec<OrgId>,
    /// Attributes plus non-augmentation traits
    pub effects_base_and_unaugmented_traits: EffectBag,
    /// Attributes plus every trait
    pub effects_with_augments: EffectBag,
    /// Every trait plus every assigned org
    pub effects_with_orgs_and_augments: EffectBag,
}

/// Apply trait templates on top of `base` in two phases.
///
/// Phase 1 adds every additive stat modifier, priority bonus, direct scalar
/// and granted mission of every trait. Phase 2 applies "set to other stat"
/// modifiers, each reading the phase-1 value of its source stat.
#[must_use]
pub fn apply_traits(base: &EffectBag, traits: &[&TraitTemplate]) -> EffectBag {
    let mut bag = base.clone();
    for template in traits {
        bag.absorb(&template.scalar_effects());
        for modifier in &template.stat_mods {
            if modifier.operation != StatOperation::Additive {
                continue;
            }
            match EffectKey::from_name(&modifier.stat) {
                Some(key) => bag.add(key, modifier.value),
                None => log::debug!(
                    "Trait {}: unknown stat `{}`",
                    template.data_name,
                    modifier.stat
                ),
            }
        }
        for bonus in &template.priority_bonuses {
            match EffectKey::for_priority(&bonus.priority) {
                Some(key) => bag.add(key, bonus.bonus),
                None => log::debug!(
                    "Trait {}: unknown priority `{}`",
                    template.data_name,
                    bonus.priority
                ),
            }
        }
        for mission in &template.missions_grant {
            bag.grant_mission(mission.clone());
        }
    }

    let additive = bag.clone();
    for template in traits {
        for modifier in &template.stat_mods {
            if modifier.operation != StatOperation::SetToStat {
                continue;
            }
            let target = EffectKey::from_name(&modifier.stat);
            let source = modifier.source_stat.as_deref().and_then(EffectKey::from_name);
            match (target, source) {
                (Some(target), Some(source)) => bag.set(target, additive.get(source)),
                _ => log::debug!(
                    "Trait {}: cannot copy `{:?}` into `{}`",
                    template.data_name,
                    modifier.source_stat,
                    modifier.stat
                ),
            }
        }
    }
    bag
}

/// Effects an org contributes: template scalars overlaid by the record's
/// own scalars, its tier, plus template tech bonuses and missions.
#[must_use]
pub fn org_effects(org: &Org, catalog: &TemplateCatalog) -> EffectBag {
    let mut bag = catalog
        .org(&org.template_name)
        .map(|template| template.effects())
        .unwrap_or_default();
    for (key, value) in org.stat_overrides.scalars() {
        bag.set(key, value);
    }
    bag.set(EffectKey::Tier, org.tier);
    bag
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgSummary {
    pub id: OrgId,
    pub template_name: String,
    pub display_name: String,
    pub faction: Option<FactionId>,
    pub assigned_councilor: Option<CouncilorId>,
    pub tier: f64,
    pub tradable: bool,
    /// The player faction's intel on this org
    pub player_intel: f64,
    pub effects: EffectBag,
}

#[must_use]
pub fn summarize_org(org: &Org, world: &World, catalog: &TemplateCatalog) -> OrgSummary {
    OrgSummary {
        id: org.id,
        template_name: org.template_name.clone(),
        display_name: org.display_name.clone(),
        faction: org.faction,
        assigned_councilor: org.assigned_councilor,
        tier: org.tier,
        tradable: catalog.org(&org.template_name).is_some_and(|t| t.tradable),
        player_intel: world.org_intel(&world.player, org),
        effects: org_effects(org, catalog),
    }
}

fn base_effects(councilor: &Councilor, catalog: &TemplateCatalog) -> EffectBag {
    let mut bag = councilor.attributes.clone();
    if let Some(kind) = catalog.councilor_type(&councilor.type_template) {
        for mission in &kind.mission_names {
            bag.grant_mission(mission.clone());
        }
    }
    bag
}

#[must_use]
pub fn councilor_effects(
    councilor: &Councilor,
    world: &World,
    catalog: &TemplateCatalog,
) -> CouncilorEffects {
    let mut unaugmented = Vec::new();
    let mut augmented = Vec::new();
    for name in &councilor.traits {
        match catalog.trait_template(name) {
            Some(t) if t.augmentation => augmented.push(t),
            Some(t) => unaugmented.push(t),
            None => log::warn!("Councilor {}: unknown trait `{name}`", councilor.id),
        }
    }

    let base = base_effects(councilor, catalog);
    let effects_base_and_unaugmented_traits = apply_traits(&base, &unaugmented);
    let all_traits: Vec<_> = unaugmented.iter().chain(&augmented).copied().collect();
    let effects_with_augments = apply_traits(&base, &all_traits);

    let mut from_orgs: EffectBag = world
        .orgs
        .resolve(&councilor.orgs)
        .into_iter()
        .map(|org| org_effects(org, catalog))
        .sum();
    // Org tiers do not carry over to the councilor.
    from_orgs.set(EffectKey::Tier, 0.0);
    let effects_with_orgs_and_augments = effects_with_augments.combine(&from_orgs);

    CouncilorEffects {
        id: councilor.id,
        display_name: councilor.display_name.clone(),
        type_template: councilor.type_template.clone(),
        faction: councilor.faction,
        traits: councilor.traits.clone(),
        orgs: councilor.orgs.clone(),
        effects_base_and_unaugmented_traits,
        effects_with_augments,
        effects_with_orgs_and_augments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn trait_template(value: serde_json::Value) -> TraitTemplate {
        serde_json::from_value(value).expect("trait")
    }

    #[test]
    fn copy_modifiers_read_the_fully_additive_result() {
        let base = EffectBag::new()
            .with(EffectKey::Command, 2.0)
            .with(EffectKey::Loyalty, 1.0);
        // The copy is listed first; it must still see the +3 from the second trait.
        let copier = trait_template(json!({
            "dataName": "Devoted",
            "statMods": [{"stat": "Loyalty", "operation": "SetToStat", "sourceStat": "Command"}]
        }));
        let booster = trait_template(json!({
            "dataName": "Veteran",
            "statMods": [{"stat": "Command", "value": 3}],
            "priorityBonuses": [{"priority": "Military", "bonus": 0.5}],
            "missionsGrant": ["Assault"]
        }));

        let bag = apply_traits(&base, &[&copier, &booster]);
        assert_eq!(bag.get(EffectKey::Command), 5.0);
        assert_eq!(bag.get(EffectKey::Loyalty), 5.0);
        assert_eq!(bag.get(EffectKey::MilitaryBonus), 0.5);
        assert_eq!(bag.missions(), ["Assault".to_string()]);
    }

    #[test]
    fn no_traits_leave_the_base_untouched() {
        let base = EffectBag::new().with(EffectKey::Science, 4.0);
        assert_eq!(apply_traits(&base, &[]), base);
    }
}
