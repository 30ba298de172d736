use crate::collection::Record;
use crate::error::Result;
use crate::ids::{BodyId, OrbitId};
use crate::raw::{self, RawRecord};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Orbit {
    pub id: OrbitId,
    pub display_name: String,
    pub barycenter: Option<BodyId>,
    /// 0 is the innermost orbit around the barycenter
    pub orbit_index: i64,
}

impl Record for Orbit {
    type Id = OrbitId;
    const KIND: &'static str = "TIOrbitState";

    fn id(&self) -> OrbitId {
        self.id
    }
}

impl Orbit {
    pub(crate) fn project(record: RawRecord<'_>) -> Result<Self> {
        let node = record.value;
        Ok(Self {
            id: OrbitId::new(record.id),
            display_name: raw::text(node, "displayName"),
            barycenter: raw::link(node, "barycenter", Self::KIND)?,
            orbit_index: node.field("orbitIndex").and_then(|n| n.as_i64()).unwrap_or(0),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    pub id: BodyId,
    pub display_name: String,
    pub object_type: String,
}

impl Record for Body {
    type Id = BodyId;
    const KIND: &'static str = "TISpaceBodyState";

    fn id(&self) -> BodyId {
        self.id
    }
}

impl Body {
    pub(crate) fn project(record: RawRecord<'_>) -> Result<Self> {
        let node = record.value;
        Ok(Self {
            id: BodyId::new(record.id),
            display_name: raw::text(node, "displayName"),
            object_type: raw::text(node, "objectType"),
        })
    }
}
