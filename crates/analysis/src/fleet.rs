use serde::Serialize;
use std::collections::BTreeMap;
use strategist_model::{FactionId, Fleet, FleetId, World};

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSummary {
    pub id: FleetId,
    pub display_name: String,
    pub faction: Option<FactionId>,
    pub target_name: Option<String>,
    /// Negative when the recorded arrival is already past
    pub days_to_arrival: Option<i64>,
    pub ship_count: usize,
    pub by_hull: BTreeMap<String, usize>,
    pub by_role: BTreeMap<String, usize>,
    pub total_combat_value: f64,
}

/// Readable destination: the barycenter body's name, except that orbits
/// around Sol are named after the orbit itself.
fn target_name(fleet: &Fleet, world: &World) -> Option<String> {
    let orbit = world.orbits.get(fleet.destination_orbit?)?;
    match orbit.barycenter {
        Some(body) if body != world.sol => world.body_name(body).map(str::to_string),
        _ => Some(orbit.display_name.clone()),
    }
}

#[must_use]
pub fn summarize_fleet(fleet: &Fleet, world: &World) -> FleetSummary {
    let ships = world.ships.resolve(&fleet.ships);
    let mut by_hull = BTreeMap::new();
    let mut by_role = BTreeMap::new();
    for ship in &ships {
        let hull = if ship.hull.is_empty() { UNKNOWN } else { ship.hull.as_str() };
        let role = if ship.role.is_empty() { UNKNOWN } else { ship.role.as_str() };
        *by_hull.entry(hull.to_string()).or_insert(0) += 1;
        *by_role.entry(role.to_string()).or_insert(0) += 1;
    }

    FleetSummary {
        id: fleet.id,
        display_name: fleet.display_name.clone(),
        faction: fleet.faction,
        target_name: target_name(fleet, world),
        days_to_arrival: fleet
            .arrival_date
            .map(|date| (date - world.globals.current_date).num_days()),
        ship_count: ships.len(),
        by_hull,
        by_role,
        total_combat_value: ships.iter().map(|s| s.combat_value).sum(),
    }
}
