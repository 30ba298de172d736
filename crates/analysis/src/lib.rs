//! # Strategist Analysis
//!
//! Derives the player-facing summaries from a save snapshot.
//!
//! ## Flow
//!
//! ```text
//! save blob ──> strategist-snapshot ──> SnapshotGraph
//!                                            │
//! template data ──> TemplateCatalog ─────────┤
//!                                            ▼
//!                                  strategist-model::World
//!                                            │
//!                                            ▼
//!                                  derive() ──> Analysis
//! ```
//!
//! [`Analyzer`] owns the catalog cache and the tunables, so a long-lived
//! process pays for template loading once.

mod analysis;
mod analyzer;
mod config;
mod councilor;
mod error;
mod faction;
mod fleet;
mod habitat;
mod interest;
mod nation;
mod research;

pub use analysis::{derive, Analysis};
pub use analyzer::Analyzer;
pub use config::{
    AnalysisConfig, HabitatConfig, IntelThresholds, MissionControlConfig, SpoilsConfig,
};
pub use councilor::{
    apply_traits, councilor_effects, org_effects, summarize_org, CouncilorEffects, OrgSummary,
};
pub use error::{AnalysisError, ErrorKind, Result};
pub use faction::{mission_control, summarize_faction, FactionSummary, MissionControl};
pub use fleet::{summarize_fleet, FleetSummary};
pub use habitat::{summarize_habitat, HabitatSummary, UpcomingModule};
pub use interest::{player_interest, PlayerInterest};
pub use nation::{control_point_cost, nation_spoils, spoils, NationSpoils};
pub use research::{
    mission_coverage, project_catalog, tech_catalog, CatalogEntry, MissionCoverage,
    ResearchStatus,
};
