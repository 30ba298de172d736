//! # Strategist Effects
//!
//! Additive effect records shared by the normalizer, the derivation engine and
//! the scorer.
//!
//! An [`EffectBag`] is a sparse record over the closed [`EffectKey`] set plus
//! two list-shaped parts: per-category tech bonuses and granted missions.
//! Bags combine associatively with the empty bag as identity:
//!
//! ```rust
//! use strategist_effects::{EffectBag, EffectKey};
//!
//! let councilor = EffectBag::new().with(EffectKey::Persuasion, 5.0);
//! let org = EffectBag::new().with(EffectKey::Command, 2.0);
//! let total = councilor.combine(&org);
//!
//! assert_eq!(total.get(EffectKey::Command), 2.0);
//! assert_eq!(total.get(EffectKey::Science), 0.0);
//! ```

mod bag;
mod key;
mod missions;

pub use bag::{EffectBag, TechBonus};
pub use key::{EffectGroup, EffectKey};
pub use missions::MissionCounts;
