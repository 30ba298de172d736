use crate::collection::Record;
use crate::error::Result;
use crate::ids::{ControlPointId, FactionId, NationId, RegionId};
use crate::raw::{self, RawRecord};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Nation {
    pub id: NationId,
    pub display_name: String,
    pub gdp: f64,
    pub democracy: f64,
    pub investment_points: f64,
    pub regions: Vec<RegionId>,
    pub control_points: Vec<ControlPointId>,
}

impl Record for Nation {
    type Id = NationId;
    const KIND: &'static str = "TINationState";

    fn id(&self) -> NationId {
        self.id
    }
}

impl Nation {
    pub(crate) fn project(record: RawRecord<'_>) -> Result<Self> {
        let node = record.value;
        let gdp = node
            .field("GDP")
            .or_else(|| node.field("gdp"))
            .and_then(|n| n.as_f64())
            .unwrap_or(0.0);
        Ok(Self {
            id: NationId::new(record.id),
            display_name: raw::text(node, "displayName"),
            gdp,
            democracy: raw::number(node, "democracy"),
            investment_points: raw::number(node, "investmentPoints"),
            regions: raw::links(node, "regions", Self::KIND)?,
            control_points: raw::links(node, "controlPoints", Self::KIND)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: RegionId,
    pub display_name: String,
    pub nation: Option<NationId>,
    pub resource_region: bool,
}

impl Record for Region {
    type Id = RegionId;
    const KIND: &'static str = "TIRegionState";

    fn id(&self) -> RegionId {
        self.id
    }
}

impl Region {
    pub(crate) fn project(record: RawRecord<'_>) -> Result<Self> {
        let node = record.value;
        Ok(Self {
            id: RegionId::new(record.id),
            display_name: raw::text(node, "displayName"),
            nation: raw::link(node, "nation", Self::KIND)?,
            resource_region: raw::flag(node, "resourceRegion"),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlPoint {
    pub id: ControlPointId,
    pub nation: NationId,
    pub faction: Option<FactionId>,
    pub kind: String,
    pub benefits_disabled: bool,
}

impl Record for ControlPoint {
    type Id = ControlPointId;
    const KIND: &'static str = "TIControlPoint";

    fn id(&self) -> ControlPointId {
        self.id
    }
}

impl ControlPoint {
    pub(crate) fn project(record: RawRecord<'_>) -> Result<Self> {
        let node = record.value;
        Ok(Self {
            id: ControlPointId::new(record.id),
            nation: raw::required_link(node, "nation", Self::KIND)?,
            faction: raw::link(node, "faction", Self::KIND)?,
            kind: raw::text(node, "controlPointType"),
            benefits_disabled: raw::flag(node, "benefitsDisabled"),
        })
    }
}
