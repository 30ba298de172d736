use crate::error::{Result, ScoringError};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use strategist_effects::EffectKey;

pub const DEFAULT_TIER_EXPONENT: f64 = 0.95;
pub const DEFAULT_MISSING_MISSION_BONUS: f64 = 5.0;
pub const DEFAULT_SINGLE_MISSION_BONUS: f64 = 2.0;

/// Caller-supplied weights for turning an effect bag into one number.
///
/// Keys without a weight score zero. Every field defaults, so a weights file
/// only needs the entries it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    #[serde(deserialize_with = "known_stats")]
    pub stats: BTreeMap<EffectKey, f64>,
    /// Tech category → weight per point of research bonus
    pub tech: BTreeMap<String, f64>,
    /// Mission name → weight per grant
    pub missions: BTreeMap<String, f64>,
    pub tier_exponent: f64,
    /// Added per granted mission nobody on the player's side has yet
    pub missing_mission_bonus: f64,
    /// Added per granted mission exactly one source already covers
    pub single_mission_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            stats: EffectKey::CORE_ATTRIBUTES
                .iter()
                .map(|key| (*key, 1.0))
                .collect(),
            tech: BTreeMap::new(),
            missions: BTreeMap::new(),
            tier_exponent: DEFAULT_TIER_EXPONENT,
            missing_mission_bonus: DEFAULT_MISSING_MISSION_BONUS,
            single_mission_bonus: DEFAULT_SINGLE_MISSION_BONUS,
        }
    }
}

/// Stat weights keyed by effect name; unknown names are dropped with a warning.
fn known_stats<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<EffectKey, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, f64>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(name, weight)| match EffectKey::from_name(&name) {
            Some(key) => Some((key, weight)),
            None => {
                log::warn!("Ignoring weight for unknown stat `{name}`");
                None
            }
        })
        .collect())
}

impl ScoringWeights {
    pub fn from_json(text: &str) -> Result<Self> {
        let weights: Self = serde_json::from_str(text)?;
        weights
            .validate()
            .map_err(|message| ScoringError::Invalid { message })?;
        Ok(weights)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.tier_exponent.is_finite() || self.tier_exponent < 0.0 {
            return Err(format!(
                "tier_exponent must be a non-negative number, got {}",
                self.tier_exponent
            ));
        }
        let bad = self
            .stats
            .values()
            .chain(self.tech.values())
            .chain(self.missions.values())
            .any(|w| !w.is_finite());
        if bad {
            return Err("weights must be finite".to_string());
        }
        Ok(())
    }

    #[must_use]
    pub fn with_stat(mut self, key: EffectKey, weight: f64) -> Self {
        self.stats.insert(key, weight);
        self
    }

    #[must_use]
    pub fn with_tech(mut self, category: impl Into<String>, weight: f64) -> Self {
        self.tech.insert(category.into(), weight);
        self
    }

    #[must_use]
    pub fn with_mission(mut self, mission: impl Into<String>, weight: f64) -> Self {
        self.missions.insert(mission.into(), weight);
        self
    }

    #[must_use]
    pub fn stat(&self, key: EffectKey) -> f64 {
        self.stats.get(&key).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn tech(&self, category: &str) -> f64 {
        self.tech.get(category).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn mission(&self, mission: &str) -> f64 {
        self.missions.get(mission).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_weigh_core_attributes_only() {
        let weights = ScoringWeights::default();
        assert_eq!(weights.stat(EffectKey::Persuasion), 1.0);
        assert_eq!(weights.stat(EffectKey::Security), 1.0);
        assert_eq!(weights.stat(EffectKey::Loyalty), 0.0);
        assert_eq!(weights.stat(EffectKey::IncomeMoney), 0.0);
        assert_eq!(weights.tier_exponent, 0.95);
    }

    #[test]
    fn partial_file_keeps_other_defaults_and_drops_unknown_stats() {
        let weights = ScoringWeights::from_json(
            r#"{"stats": {"IncomeMoney": 0.5, "charisma": 3}, "missions": {"Steal": 4}}"#,
        )
        .expect("weights");
        assert_eq!(weights.stat(EffectKey::IncomeMoney), 0.5);
        // An explicit stats map replaces the default one.
        assert_eq!(weights.stat(EffectKey::Persuasion), 0.0);
        assert_eq!(weights.stats.len(), 1);
        assert_eq!(weights.mission("Steal"), 4.0);
        assert_eq!(weights.missing_mission_bonus, 5.0);
    }

    #[test]
    fn negative_exponent_is_rejected() {
        let err = ScoringWeights::from_json(r#"{"tier_exponent": -1}"#).unwrap_err();
        assert!(matches!(err, ScoringError::Invalid { .. }));
        assert!(matches!(
            ScoringWeights::from_json("{"),
            Err(ScoringError::Parse(_))
        ));
    }
}
