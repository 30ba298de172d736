use crate::collection::{Collection, Record};
use crate::councilor::{Councilor, Org};
use crate::error::{ModelError, Result};
use crate::faction::{Faction, Player};
use crate::fleet::{Fleet, Ship};
use crate::globals::Globals;
use crate::habitat::{HabModule, Habitat, Sector};
use crate::ids::{BodyId, FactionId, HabModuleId};
use crate::nation::{ControlPoint, Nation, Region};
use crate::raw::{self, RawRecord};
use crate::space::{Body, Orbit};
use std::collections::{BTreeSet, HashSet};
use strategist_snapshot::{NodeRef, SnapshotGraph};
use strategist_templates::TemplateCatalog;

pub const SOL: &str = "Sol";
pub const EARTH: &str = "Earth";

/// Every normalized collection of one snapshot plus its anchors.
///
/// Built by [`World::normalize`] and read-only afterwards.
#[derive(Debug, Clone)]
pub struct World {
    pub globals: Globals,
    /// The one faction controlled by a human player
    pub player: Faction,
    pub sol: BodyId,
    pub earth: BodyId,

    pub players: Collection<Player>,
    pub factions: Collection<Faction>,
    pub councilors: Collection<Councilor>,
    pub orgs: Collection<Org>,
    pub habitats: Collection<Habitat>,
    pub sectors: Collection<Sector>,
    pub hab_modules: Collection<HabModule>,
    pub fleets: Collection<Fleet>,
    pub ships: Collection<Ship>,
    pub nations: Collection<Nation>,
    pub regions: Collection<Region>,
    pub control_points: Collection<ControlPoint>,
    pub orbits: Collection<Orbit>,
    pub bodies: Collection<Body>,
}

fn collect<'a, R, F>(gamestates: NodeRef<'a>, project: F) -> Result<Collection<R>>
where
    R: Record,
    F: Fn(RawRecord<'a>) -> Result<R>,
{
    let records = raw::raw_records(gamestates, R::KIND)?
        .into_iter()
        .map(project)
        .collect::<Result<Vec<_>>>()?;
    Ok(Collection::new(records))
}

impl World {
    /// Project every supported collection and check the anchors.
    ///
    /// Fails when the human player's faction, the `Sol` or `Earth` body, or
    /// the game time is missing.
    pub fn normalize(graph: &SnapshotGraph, catalog: &TemplateCatalog) -> Result<Self> {
        let gamestates = graph
            .root()
            .field("gamestates")
            .ok_or(ModelError::MissingSection {
                section: "gamestates",
            })?;

        let globals = Globals::project(gamestates)?;
        let players = collect(gamestates, Player::project)?;
        let factions = join_player_control(collect(gamestates, Faction::project)?, &players);
        let player = find_player_faction(&factions)?.clone();

        let bodies: Collection<Body> = collect(gamestates, Body::project)?;
        let sol = find_body(&bodies, SOL)?;
        let earth = find_body(&bodies, EARTH)?;

        let world = Self {
            globals,
            player,
            sol,
            earth,
            players,
            factions,
            councilors: collect(gamestates, Councilor::project)?,
            orgs: collect(gamestates, |r| Org::project(r, catalog))?,
            habitats: collect(gamestates, Habitat::project)?,
            sectors: collect(gamestates, Sector::project)?,
            hab_modules: collect(gamestates, HabModule::project)?,
            fleets: collect(gamestates, Fleet::project)?,
            ships: collect(gamestates, Ship::project)?,
            nations: collect(gamestates, Nation::project)?,
            regions: collect(gamestates, Region::project)?,
            control_points: collect(gamestates, ControlPoint::project)?,
            orbits: collect(gamestates, Orbit::project)?,
            bodies,
        };
        log::debug!(
            "Normalized world: {} factions, {} councilors, {} orgs, {} habitats, {} fleets, {} nations",
            world.factions.len(),
            world.councilors.len(),
            world.orgs.len(),
            world.habitats.len(),
            world.fleets.len(),
            world.nations.len()
        );
        Ok(world)
    }

    pub fn owned_orgs(&self, faction: FactionId) -> impl Iterator<Item = &Org> + '_ {
        self.orgs
            .iter()
            .filter(move |org| org.faction == Some(faction))
    }

    /// Orgs in the unclaimed pool
    pub fn unowned_orgs(&self) -> impl Iterator<Item = &Org> + '_ {
        self.orgs.iter().filter(|org| org.faction.is_none())
    }

    /// What `viewer` knows about an org: the better of its direct intel and
    /// its intel on the assigned councilor.
    #[must_use]
    pub fn org_intel(&self, viewer: &Faction, org: &Org) -> f64 {
        let via_councilor = org
            .assigned_councilor
            .map_or(0.0, |c| viewer.intel.councilor(c));
        viewer.intel.org(org.id).max(via_councilor)
    }

    /// Rival-owned orgs whose intel meets `threshold`
    #[must_use]
    pub fn visible_orgs(&self, viewer: FactionId, threshold: f64) -> Vec<&Org> {
        let Some(viewer) = self.factions.get(viewer) else {
            return Vec::new();
        };
        self.orgs
            .iter()
            .filter(|org| org.faction.is_some_and(|f| f != viewer.id))
            .filter(|org| self.org_intel(viewer, org) >= threshold)
            .collect()
    }

    /// Rival councilors whose intel meets `threshold`
    #[must_use]
    pub fn visible_councilors(&self, viewer: FactionId, threshold: f64) -> Vec<&Councilor> {
        let Some(viewer) = self.factions.get(viewer) else {
            return Vec::new();
        };
        self.councilors
            .iter()
            .filter(|c| c.faction.is_some_and(|f| f != viewer.id))
            .filter(|c| viewer.intel.councilor(c.id) >= threshold)
            .collect()
    }

    /// Modules of a habitat in id order, whether listed by the sector or
    /// linking back to it
    #[must_use]
    pub fn habitat_modules(&self, habitat: &Habitat) -> Vec<&HabModule> {
        let sectors: HashSet<_> = habitat.sectors.iter().copied().collect();
        let mut ids: BTreeSet<HabModuleId> = self
            .sectors
            .resolve(&habitat.sectors)
            .into_iter()
            .flat_map(|sector| sector.modules.iter().copied())
            .collect();
        ids.extend(
            self.hab_modules
                .iter()
                .filter(|m| m.sector.is_some_and(|s| sectors.contains(&s)))
                .map(|m| m.id),
        );
        self.hab_modules.resolve(&ids)
    }

    #[must_use]
    pub fn body_name(&self, id: BodyId) -> Option<&str> {
        self.bodies.get(id).map(|b| b.display_name.as_str())
    }
}

fn join_player_control(
    factions: Collection<Faction>,
    players: &Collection<Player>,
) -> Collection<Faction> {
    let human: HashSet<FactionId> = players
        .iter()
        .filter(|p| !p.is_ai)
        .filter_map(|p| p.faction)
        .collect();
    let joined = factions
        .iter()
        .cloned()
        .map(|mut faction| {
            let by_link = faction
                .player
                .and_then(|p| players.get(p))
                .is_some_and(|p| !p.is_ai);
            faction.is_ai = !(by_link || human.contains(&faction.id));
            faction
        })
        .collect();
    Collection::new(joined)
}

fn find_player_faction(factions: &Collection<Faction>) -> Result<&Faction> {
    let mut humans = factions.iter().filter(|f| !f.is_ai);
    let player = humans
        .next()
        .ok_or_else(|| ModelError::anchor("player faction"))?;
    let extra = humans.count();
    if extra > 0 {
        log::warn!(
            "{} human-controlled factions; analysing {} ({})",
            extra + 1,
            player.display_name,
            player.id
        );
    }
    Ok(player)
}

fn find_body(bodies: &Collection<Body>, name: &str) -> Result<BodyId> {
    bodies
        .iter()
        .find(|b| b.display_name == name)
        .map(|b| b.id)
        .ok_or_else(|| ModelError::anchor(name))
}
