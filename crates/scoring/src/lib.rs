//! # Strategist Scoring
//!
//! Weighted scoring of effect bags with tier normalization and mission
//! rarity bonuses.
//!
//! ```rust
//! use strategist_effects::{EffectBag, EffectKey, MissionCounts};
//! use strategist_scoring::{score, ScoreOptions, ScoringWeights};
//!
//! let bag = EffectBag::new()
//!     .with(EffectKey::Persuasion, 5.0)
//!     .with(EffectKey::Command, 2.0);
//! let weights = ScoringWeights::default();
//! let result = score(&bag, &weights, &MissionCounts::new(), ScoreOptions::default());
//! assert_eq!(result.value, 7.0);
//! ```

mod error;
mod rank;
mod score;
mod weights;

pub use error::{Result, ScoringError};
pub use rank::{rank, Ranked};
pub use score::{score, Score, ScoreOptions};
pub use weights::{
    ScoringWeights, DEFAULT_MISSING_MISSION_BONUS, DEFAULT_SINGLE_MISSION_BONUS,
    DEFAULT_TIER_EXPONENT,
};
