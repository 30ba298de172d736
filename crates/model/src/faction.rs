use crate::collection::Record;
use crate::error::Result;
use crate::ids::{CouncilorId, FactionId, OrgId, PlayerId};
use crate::raw::{self, RawRecord};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use strategist_snapshot::NodeRef;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub faction: Option<FactionId>,
    pub is_ai: bool,
}

impl Record for Player {
    type Id = PlayerId;
    const KIND: &'static str = "TIPlayerState";

    fn id(&self) -> PlayerId {
        self.id
    }
}

impl Player {
    pub(crate) fn project(record: RawRecord<'_>) -> Result<Self> {
        let node = record.value;
        Ok(Self {
            id: PlayerId::new(record.id),
            faction: raw::link(node, "faction", Self::KIND)?,
            is_ai: raw::flag(node, "isAI"),
        })
    }
}

fn raise<K: Ord>(levels: &mut BTreeMap<K, f64>, key: K, level: f64) {
    let slot = levels.entry(key).or_insert(level);
    *slot = slot.max(level);
}

/// A faction's intelligence levels, split by target kind
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntelTable {
    pub councilors: BTreeMap<CouncilorId, f64>,
    pub orgs: BTreeMap<OrgId, f64>,
    pub factions: BTreeMap<FactionId, f64>,
}

impl IntelTable {
    fn project(node: NodeRef<'_>) -> Result<Self> {
        let mut table = Self::default();
        let Some(entries) = node.field("intel") else {
            return Ok(table);
        };
        for entry in entries.items() {
            let Some(target) = raw::link::<u64>(entry, "target", Faction::KIND)? else {
                continue;
            };
            let level = raw::number(entry, "level");
            match raw::text(entry, "targetType").as_str() {
                "TICouncilorState" => raise(&mut table.councilors, CouncilorId::new(target), level),
                "TIOrgState" => raise(&mut table.orgs, OrgId::new(target), level),
                "TIFactionState" => raise(&mut table.factions, FactionId::new(target), level),
                other => log::trace!("Ignoring intel on unsupported target type `{other}`"),
            }
        }
        Ok(table)
    }

    #[must_use]
    pub fn councilor(&self, id: CouncilorId) -> f64 {
        self.councilors.get(&id).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn org(&self, id: OrgId) -> f64 {
        self.orgs.get(&id).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn faction(&self, id: FactionId) -> f64 {
        self.factions.get(&id).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Faction {
    pub id: FactionId,
    pub template_name: String,
    pub display_name: String,
    pub player: Option<PlayerId>,
    /// Joined from the controlling player; a faction without one is AI
    pub is_ai: bool,
    pub councilors: Vec<CouncilorId>,
    pub available_councilors: Vec<CouncilorId>,
    pub mission_control_usage: f64,
    pub mission_control_capacity: f64,
    pub completed_projects: BTreeSet<String>,
    pub available_projects: BTreeSet<String>,
    pub project_progress: BTreeMap<String, f64>,
    pub intel: IntelTable,
}

impl Record for Faction {
    type Id = FactionId;
    const KIND: &'static str = "TIFactionState";

    fn id(&self) -> FactionId {
        self.id
    }
}

impl Faction {
    pub(crate) fn project(record: RawRecord<'_>) -> Result<Self> {
        let node = record.value;
        let template_name = raw::text(node, "templateName");
        let display_name = Some(raw::text(node, "displayName"))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| template_name.clone());
        Ok(Self {
            id: FactionId::new(record.id),
            template_name,
            display_name,
            player: raw::link(node, "player", Self::KIND)?,
            is_ai: true,
            councilors: raw::links(node, "councilors", Self::KIND)?,
            available_councilors: raw::links(node, "availableCouncilors", Self::KIND)?,
            mission_control_usage: raw::number(node, "missionControlUsage"),
            mission_control_capacity: raw::number(node, "missionControlCapacity"),
            completed_projects: raw::strings(node, "finishedProjectNames").into_iter().collect(),
            available_projects: raw::strings(node, "availableProjectNames")
                .into_iter()
                .collect(),
            project_progress: raw::named_amounts(
                node,
                "projectProgress",
                "projectName",
                "accumulatedResearch",
            )
            .into_iter()
            .collect(),
            intel: IntelTable::project(node)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strategist_snapshot::SnapshotGraph;

    #[test]
    fn intel_splits_by_target_kind_and_keeps_the_highest_level() {
        let graph = SnapshotGraph::resolve(json!({
            "intel": [
                {"target": {"value": 10}, "targetType": "TICouncilorState", "level": 0.25},
                {"target": {"value": 10}, "targetType": "TICouncilorState", "level": 0.75},
                {"target": {"value": 10}, "targetType": "TIOrgState", "level": 0.5},
                {"target": {"value": 3}, "targetType": "TIFactionState", "level": 1.0},
                {"target": {"value": 3}, "targetType": "TINationState", "level": 1.0}
            ]
        }))
        .expect("resolve");
        let table = IntelTable::project(graph.root()).expect("intel");
        assert_eq!(table.councilor(CouncilorId::new(10)), 0.75);
        assert_eq!(table.org(OrgId::new(10)), 0.5);
        assert_eq!(table.faction(FactionId::new(3)), 1.0);
        assert_eq!(table.org(OrgId::new(99)), 0.0);
    }
}
