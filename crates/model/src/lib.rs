//! # Strategist Model
//!
//! Normalizes a resolved snapshot into typed, id-keyed collections.
//!
//! Each raw collection `PavonisInteractive.TerraInvicta.<Kind>` becomes a
//! [`Collection`] of small records carrying only what derivation needs.
//! Cross-kind links are typed ids ([`FactionId`], [`OrbitId`], ...), never
//! bare integers.
//!
//! Normalization fails fast when an anchor is missing: the human player's
//! faction, the `Sol` and `Earth` bodies, or the game time.

mod collection;
mod councilor;
mod error;
mod faction;
mod fleet;
mod globals;
mod habitat;
mod ids;
mod nation;
mod raw;
mod space;
mod world;

pub use collection::{Collection, Record};
pub use councilor::{Councilor, Org};
pub use error::{ModelError, Result};
pub use faction::{Faction, IntelTable, Player};
pub use fleet::{Fleet, Ship};
pub use globals::{Globals, Research, DEFAULT_DIFFICULTY};
pub use habitat::{HabModule, Habitat, HabitatKind, Sector};
pub use ids::{
    BodyId, ControlPointId, CouncilorId, FactionId, FleetId, HabModuleId, HabitatId, NationId,
    OrbitId, OrgId, PlayerId, RegionId, SectorId, ShipId,
};
pub use nation::{ControlPoint, Nation, Region};
pub use space::{Body, Orbit};
pub use world::{World, EARTH, SOL};
