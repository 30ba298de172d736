use crate::config::AnalysisConfig;
use crate::councilor::{councilor_effects, summarize_org, CouncilorEffects, OrgSummary};
use crate::faction::{summarize_faction, FactionSummary};
use crate::fleet::{summarize_fleet, FleetSummary};
use crate::habitat::{summarize_habitat, HabitatSummary};
use crate::interest::{player_interest, PlayerInterest};
use crate::nation::{nation_spoils, NationSpoils};
use crate::research::{
    mission_coverage, project_catalog, tech_catalog, CatalogEntry, MissionCoverage,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use strategist_effects::MissionCounts;
use strategist_model::{CouncilorId, OrgId, World};
use strategist_templates::TemplateCatalog;

/// Everything derived from one snapshot, from the player's point of view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub current_date: NaiveDate,
    pub difficulty: String,
    pub player: FactionSummary,
    pub factions: Vec<FactionSummary>,
    /// Player, pool and visible rival councilors
    pub councilors: Vec<CouncilorEffects>,
    /// Player, pool and visible rival orgs
    pub orgs: Vec<OrgSummary>,
    pub habitats: Vec<HabitatSummary>,
    pub fleets: Vec<FleetSummary>,
    pub nations: Vec<NationSpoils>,
    pub interest: PlayerInterest,
    pub techs: Vec<CatalogEntry>,
    pub projects: Vec<CatalogEntry>,
    /// Missions granted across the player's councilors
    pub mission_counts: MissionCounts,
    pub missions: Vec<MissionCoverage>,
}

impl Analysis {
    #[must_use]
    pub fn councilor(&self, id: CouncilorId) -> Option<&CouncilorEffects> {
        self.councilors.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn org(&self, id: OrgId) -> Option<&OrgSummary> {
        self.orgs.iter().find(|o| o.id == id)
    }

    /// Councilors serving the player faction
    pub fn player_councilors(&self) -> impl Iterator<Item = &CouncilorEffects> + '_ {
        let player = self.player.id;
        self.councilors
            .iter()
            .filter(move |c| c.faction == Some(player))
    }
}

fn player_councilor_ids(world: &World) -> BTreeSet<CouncilorId> {
    let player = world.player.id;
    world
        .councilors
        .iter()
        .filter(|c| c.faction == Some(player))
        .map(|c| c.id)
        .chain(world.player.councilors.iter().copied())
        .collect()
}

/// Run every derivation over a normalized world.
#[must_use]
pub fn derive(world: &World, catalog: &TemplateCatalog, config: &AnalysisConfig) -> Analysis {
    let interest = player_interest(world, catalog, &config.intel);

    let player_councilors = player_councilor_ids(world);
    let councilor_ids: BTreeSet<CouncilorId> = player_councilors
        .iter()
        .chain(&interest.available_councilors)
        .chain(&interest.visible_councilors)
        .copied()
        .collect();
    let councilors: Vec<CouncilorEffects> = world
        .councilors
        .resolve(&councilor_ids)
        .into_iter()
        .map(|c| councilor_effects(c, world, catalog))
        .collect();

    let org_ids: BTreeSet<OrgId> = world
        .owned_orgs(world.player.id)
        .map(|o| o.id)
        .chain(interest.available_orgs.iter().copied())
        .chain(interest.visible_orgs.iter().copied())
        .collect();
    let orgs = world
        .orgs
        .resolve(&org_ids)
        .into_iter()
        .map(|o| summarize_org(o, world, catalog))
        .collect();

    let habitats: Vec<HabitatSummary> = world
        .habitats
        .iter()
        .map(|h| summarize_habitat(h, world, catalog, &config.habitat))
        .collect();
    let factions: Vec<FactionSummary> = world
        .factions
        .iter()
        .map(|f| summarize_faction(f, world, catalog, &habitats, &config.mission_control))
        .collect();
    let player = summarize_faction(
        &world.player,
        world,
        catalog,
        &habitats,
        &config.mission_control,
    );

    let mission_counts = MissionCounts::from_bags(
        councilors
            .iter()
            .filter(|c| player_councilors.contains(&c.id))
            .map(|c| &c.effects_with_orgs_and_augments),
    );
    let missions = mission_coverage(&mission_counts, catalog);

    log::debug!(
        "Derived {} councilors, {} orgs, {} habitats for {}",
        councilors.len(),
        org_ids.len(),
        habitats.len(),
        world.player.display_name
    );

    Analysis {
        current_date: world.globals.current_date,
        difficulty: world.globals.difficulty.clone(),
        player,
        factions,
        councilors,
        orgs,
        habitats,
        fleets: world.fleets.iter().map(|f| summarize_fleet(f, world)).collect(),
        nations: world
            .nations
            .iter()
            .map(|n| nation_spoils(n, world, &config.spoils))
            .collect(),
        interest,
        techs: tech_catalog(world, catalog),
        projects: project_catalog(world, catalog),
        mission_counts,
        missions,
    }
}
