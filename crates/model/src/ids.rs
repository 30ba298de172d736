use serde::Serialize;
use std::fmt;

macro_rules! entity_ids {
    ($( $(#[$meta:meta])* $name:ident; )+) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
            #[serde(transparent)]
            pub struct $name(u64);

            impl $name {
                #[must_use]
                pub const fn new(raw: u64) -> Self {
                    Self(raw)
                }

                #[must_use]
                pub const fn get(self) -> u64 {
                    self.0
                }
            }

            impl From<u64> for $name {
                fn from(raw: u64) -> Self {
                    Self(raw)
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )+
    };
}

entity_ids! {
    PlayerId;
    FactionId;
    CouncilorId;
    OrgId;
    HabitatId;
    SectorId;
    HabModuleId;
    FleetId;
    ShipId;
    NationId;
    RegionId;
    ControlPointId;
    OrbitId;
    BodyId;
}
