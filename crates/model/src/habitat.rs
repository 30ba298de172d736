use crate::collection::Record;
use crate::error::Result;
use crate::ids::{BodyId, FactionId, HabModuleId, HabitatId, OrbitId, SectorId};
use crate::raw::{self, RawRecord};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HabitatKind {
    /// Surface installation on a body
    Base,
    /// Orbital installation
    Station,
}

impl HabitatKind {
    fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("base") {
            Self::Base
        } else {
            Self::Station
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Habitat {
    pub id: HabitatId,
    pub display_name: String,
    pub faction: Option<FactionId>,
    pub kind: HabitatKind,
    pub tier: u32,
    pub orbit: Option<OrbitId>,
    pub site_body: Option<BodyId>,
    pub sectors: Vec<SectorId>,
}

impl Record for Habitat {
    type Id = HabitatId;
    const KIND: &'static str = "TIHabState";

    fn id(&self) -> HabitatId {
        self.id
    }
}

impl Habitat {
    pub(crate) fn project(record: RawRecord<'_>) -> Result<Self> {
        let node = record.value;
        let tier = node
            .field("tier")
            .and_then(|n| n.as_u64())
            .and_then(|t| u32::try_from(t).ok())
            .unwrap_or(1);
        Ok(Self {
            id: HabitatId::new(record.id),
            display_name: raw::text(node, "displayName"),
            faction: raw::link(node, "faction", Self::KIND)?,
            kind: HabitatKind::parse(&raw::text(node, "habType")),
            tier,
            orbit: raw::link(node, "orbitState", Self::KIND)?,
            site_body: raw::link(node, "body", Self::KIND)?,
            sectors: raw::links(node, "sectors", Self::KIND)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sector {
    pub id: SectorId,
    pub habitat: HabitatId,
    pub modules: Vec<HabModuleId>,
}

impl Record for Sector {
    type Id = SectorId;
    const KIND: &'static str = "TISectorState";

    fn id(&self) -> SectorId {
        self.id
    }
}

impl Sector {
    pub(crate) fn project(record: RawRecord<'_>) -> Result<Self> {
        let node = record.value;
        Ok(Self {
            id: SectorId::new(record.id),
            habitat: raw::required_link(node, "hab", Self::KIND)?,
            modules: raw::links(node, "habModules", Self::KIND)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabModule {
    pub id: HabModuleId,
    pub template_name: String,
    pub sector: Option<SectorId>,
    pub powered: bool,
    pub destroyed: bool,
    /// Absent for modules that were never under construction
    pub completion_date: Option<NaiveDate>,
}

impl Record for HabModule {
    type Id = HabModuleId;
    const KIND: &'static str = "TIHabModuleState";

    fn id(&self) -> HabModuleId {
        self.id
    }
}

impl HabModule {
    pub(crate) fn project(record: RawRecord<'_>) -> Result<Self> {
        let node = record.value;
        Ok(Self {
            id: HabModuleId::new(record.id),
            template_name: raw::text(node, "templateName"),
            sector: raw::link(node, "sector", Self::KIND)?,
            powered: raw::flag(node, "powered"),
            destroyed: raw::flag(node, "destroyed"),
            completion_date: raw::date(node, "completionDate", Self::KIND)?,
        })
    }

    /// Finished on or before `today`, or never had a completion date
    #[must_use]
    pub fn is_complete(&self, today: NaiveDate) -> bool {
        self.completion_date.map_or(true, |done| done <= today)
    }
}
