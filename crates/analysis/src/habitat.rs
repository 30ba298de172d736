use crate::config::HabitatConfig;
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use strategist_effects::EffectBag;
use strategist_model::{FactionId, HabModule, HabModuleId, Habitat, HabitatId, HabitatKind, World};
use strategist_templates::TemplateCatalog;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingModule {
    pub module: HabModuleId,
    pub template_name: String,
    pub completion_date: NaiveDate,
    pub important: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitatSummary {
    pub id: HabitatId,
    pub display_name: String,
    pub faction: Option<FactionId>,
    pub kind: HabitatKind,
    pub tier: u32,
    pub in_home_orbit: bool,
    /// Powered modules that are complete
    pub active_effects: EffectBag,
    /// Every module that is not destroyed, finished or not
    pub potential_effects: EffectBag,
    pub next_completion: Option<UpcomingModule>,
    /// Only ever set for bases
    pub missing_mining: bool,
}

/// True for a station in the configured near orbit of Earth
fn in_home_orbit(habitat: &Habitat, world: &World, config: &HabitatConfig) -> bool {
    habitat
        .orbit
        .and_then(|id| world.orbits.get(id))
        .is_some_and(|orbit| {
            orbit.barycenter == Some(world.earth) && orbit.orbit_index == config.home_orbit_index
        })
}

/// Urgency order: important modules first, then earlier dates, then lower ids
fn by_urgency(a: &UpcomingModule, b: &UpcomingModule) -> Ordering {
    b.important
        .cmp(&a.important)
        .then(a.completion_date.cmp(&b.completion_date))
        .then(a.module.cmp(&b.module))
}

fn module_effects(module: &HabModule, catalog: &TemplateCatalog, home_orbit: bool) -> EffectBag {
    let Some(template) = catalog.hab_module(&module.template_name) else {
        log::debug!("Module {} has no template `{}`", module.id, module.template_name);
        return EffectBag::new();
    };
    let mut bag = template.effects();
    if home_orbit {
        bag.absorb(&template.home_orbit_effects());
    }
    bag
}

#[must_use]
pub fn summarize_habitat(
    habitat: &Habitat,
    world: &World,
    catalog: &TemplateCatalog,
    config: &HabitatConfig,
) -> HabitatSummary {
    let today = world.globals.current_date;
    let home_orbit = in_home_orbit(habitat, world, config);
    let modules: Vec<&HabModule> = world
        .habitat_modules(habitat)
        .into_iter()
        .filter(|m| !m.destroyed)
        .collect();

    let mut active_effects = EffectBag::new();
    let mut potential_effects = EffectBag::new();
    for module in &modules {
        let bag = module_effects(module, catalog, home_orbit);
        if module.powered && module.is_complete(today) {
            active_effects.absorb(&bag);
        }
        potential_effects.absorb(&bag);
    }

    let next_completion = modules
        .iter()
        .filter_map(|m| {
            let date = m.completion_date.filter(|d| *d > today)?;
            Some(UpcomingModule {
                module: m.id,
                template_name: m.template_name.clone(),
                completion_date: date,
                important: config.is_important(&m.template_name),
            })
        })
        .min_by(by_urgency);

    let missing_mining = habitat.kind == HabitatKind::Base
        && !modules.iter().any(|m| config.is_mining(&m.template_name));

    HabitatSummary {
        id: habitat.id,
        display_name: habitat.display_name.clone(),
        faction: habitat.faction,
        kind: habitat.kind,
        tier: habitat.tier,
        in_home_orbit: home_orbit,
        active_effects,
        potential_effects,
        next_completion,
        missing_mining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upcoming(id: u64, day: u32, important: bool) -> UpcomingModule {
        UpcomingModule {
            module: HabModuleId::new(id),
            template_name: String::new(),
            completion_date: NaiveDate::from_ymd_opt(2026, 5, day).expect("date"),
            important,
        }
    }

    #[test]
    fn important_outranks_an_earlier_date() {
        let soon = upcoming(1, 2, false);
        let later_important = upcoming(2, 20, true);
        let picked = [soon, later_important.clone()].into_iter().min_by(by_urgency);
        assert_eq!(picked, Some(later_important));
    }

    #[test]
    fn same_date_falls_back_to_lower_id() {
        let a = upcoming(7, 9, true);
        let b = upcoming(3, 9, true);
        let picked = [a, b.clone()].into_iter().min_by(by_urgency);
        assert_eq!(picked, Some(b));
    }
}
