use crate::collection::Record;
use crate::error::Result;
use crate::ids::{FactionId, FleetId, OrbitId, ShipId};
use crate::raw::{self, RawRecord};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fleet {
    pub id: FleetId,
    pub display_name: String,
    pub faction: Option<FactionId>,
    pub ships: Vec<ShipId>,
    pub destination_orbit: Option<OrbitId>,
    pub arrival_date: Option<NaiveDate>,
}

impl Record for Fleet {
    type Id = FleetId;
    const KIND: &'static str = "TISpaceFleetState";

    fn id(&self) -> FleetId {
        self.id
    }
}

impl Fleet {
    pub(crate) fn project(record: RawRecord<'_>) -> Result<Self> {
        let node = record.value;
        let (destination_orbit, arrival_date) = match node.field("trajectory") {
            Some(trajectory) => (
                raw::link(trajectory, "destinationOrbit", Self::KIND)?,
                raw::date(trajectory, "arrivalTime", Self::KIND)?,
            ),
            None => (None, None),
        };
        Ok(Self {
            id: FleetId::new(record.id),
            display_name: raw::text(node, "displayName"),
            faction: raw::link(node, "faction", Self::KIND)?,
            ships: raw::links(node, "ships", Self::KIND)?,
            destination_orbit,
            arrival_date,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    pub id: ShipId,
    pub display_name: String,
    pub faction: Option<FactionId>,
    pub fleet: Option<FleetId>,
    pub design_name: String,
    pub hull: String,
    pub role: String,
    pub combat_value: f64,
    /// Full design object, module layout included
    pub design: Value,
}

impl Record for Ship {
    type Id = ShipId;
    const KIND: &'static str = "TISpaceShipState";

    fn id(&self) -> ShipId {
        self.id
    }
}

impl Ship {
    pub(crate) fn project(record: RawRecord<'_>) -> Result<Self> {
        let node = record.value;
        let design = node.field("design");
        let design_text = |field: &str| design.map(|d| raw::text(d, field)).unwrap_or_default();
        let combat_value = node
            .field("combatValue")
            .or_else(|| design.and_then(|d| d.field("combatValue")))
            .and_then(|n| n.as_f64())
            .unwrap_or(0.0);
        Ok(Self {
            id: ShipId::new(record.id),
            display_name: raw::text(node, "displayName"),
            faction: raw::link(node, "faction", Self::KIND)?,
            fleet: raw::link(node, "fleet", Self::KIND)?,
            design_name: design_text("dataName"),
            hull: design_text("hullName"),
            role: design_text("role"),
            combat_value,
            design: design.map(|d| d.to_value()).unwrap_or(Value::Null),
        })
    }
}
