use crate::config::IntelThresholds;
use serde::Serialize;
use std::collections::BTreeSet;
use strategist_model::{CouncilorId, OrgId, World};
use strategist_templates::TemplateCatalog;

/// Entities the player can act on, by id
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInterest {
    pub visible_councilors: Vec<CouncilorId>,
    pub available_councilors: Vec<CouncilorId>,
    pub visible_orgs: Vec<OrgId>,
    /// Unowned orgs in the pool
    pub available_orgs: Vec<OrgId>,
    /// Player orgs with no councilor
    pub unassigned_orgs: Vec<OrgId>,
    /// Visible, well-known and tradable
    pub stealable_orgs: Vec<OrgId>,
}

#[must_use]
pub fn player_interest(
    world: &World,
    catalog: &TemplateCatalog,
    thresholds: &IntelThresholds,
) -> PlayerInterest {
    let player = &world.player;
    let visible_orgs = world.visible_orgs(player.id, thresholds.visible_threshold);
    let stealable_orgs = visible_orgs
        .iter()
        .filter(|org| world.org_intel(player, org) >= thresholds.stealable_threshold)
        .filter(|org| catalog.org(&org.template_name).is_some_and(|t| t.tradable))
        .map(|org| org.id)
        .collect();
    let available_councilors: BTreeSet<CouncilorId> =
        player.available_councilors.iter().copied().collect();

    PlayerInterest {
        visible_councilors: world
            .visible_councilors(player.id, thresholds.visible_threshold)
            .iter()
            .map(|c| c.id)
            .collect(),
        available_councilors: available_councilors.into_iter().collect(),
        visible_orgs: visible_orgs.iter().map(|org| org.id).collect(),
        available_orgs: world.unowned_orgs().map(|org| org.id).collect(),
        unassigned_orgs: world
            .owned_orgs(player.id)
            .filter(|org| org.assigned_councilor.is_none())
            .map(|org| org.id)
            .collect(),
        stealable_orgs,
    }
}
