use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tunables for the derivation engine.
///
/// Every section defaults independently, so a partial JSON file is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub intel: IntelThresholds,
    pub mission_control: MissionControlConfig,
    pub spoils: SpoilsConfig,
    pub habitat: HabitatConfig,
}

/// Intel levels gating what the player can see and steal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntelThresholds {
    pub visible_threshold: f64,
    pub stealable_threshold: f64,
}

impl Default for IntelThresholds {
    fn default() -> Self {
        Self {
            visible_threshold: 0.25,
            stealable_threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionControlConfig {
    /// Base usage limit per difficulty name
    pub base_by_difficulty: BTreeMap<String, f64>,
    /// Multiplier applied once per completed masking project
    pub masking_decay: f64,
    pub masking_projects: Vec<String>,
    pub alien_war_numerator: f64,
}

impl Default for MissionControlConfig {
    fn default() -> Self {
        Self {
            base_by_difficulty: [
                ("Story", 1.5),
                ("Normal", 1.25),
                ("Veteran", 1.0),
                ("Brutal", 0.75),
            ]
            .into_iter()
            .map(|(name, base)| (name.to_string(), base))
            .collect(),
            masking_decay: 0.8,
            masking_projects: vec![
                "Project_MissionControlMasking".to_string(),
                "Project_AdvancedMissionControlMasking".to_string(),
                "Project_MissionControlSignatureReduction".to_string(),
            ],
            alien_war_numerator: 50.0,
        }
    }
}

impl MissionControlConfig {
    /// Base limit for a difficulty; unknown names use `Normal`
    #[must_use]
    pub fn base_for(&self, difficulty: &str) -> f64 {
        self.base_by_difficulty
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(difficulty))
            .or_else(|| self.base_by_difficulty.get_key_value("Normal"))
            .map_or(1.0, |(_, base)| *base)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpoilsConfig {
    pub money_per_investment_point: f64,
    pub money_per_resource_region: f64,
    /// Democracy at or above this yields no extra spoils
    pub democracy_ceiling: f64,
    pub money_per_missing_democracy: f64,
}

impl Default for SpoilsConfig {
    fn default() -> Self {
        Self {
            money_per_investment_point: 1.0,
            money_per_resource_region: 4.0,
            democracy_ceiling: 10.0,
            money_per_missing_democracy: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HabitatConfig {
    /// Lowercase substrings marking a module as important
    pub important_keywords: Vec<String>,
    /// Lowercase substrings marking a module as mining-capable
    pub mining_keywords: Vec<String>,
    /// Orbit index counted as the home planet's near orbit
    pub home_orbit_index: i64,
}

impl Default for HabitatConfig {
    fn default() -> Self {
        Self {
            important_keywords: ["mining", "mine", "dock", "depot", "core"]
                .map(String::from)
                .to_vec(),
            mining_keywords: ["mining", "mine"].map(String::from).to_vec(),
            home_orbit_index: 0,
        }
    }
}

impl HabitatConfig {
    #[must_use]
    pub fn is_important(&self, template_name: &str) -> bool {
        contains_any(template_name, &self.important_keywords)
    }

    #[must_use]
    pub fn is_mining(&self, template_name: &str) -> bool {
        contains_any(template_name, &self.mining_keywords)
    }
}

fn contains_any(name: &str, keywords: &[String]) -> bool {
    let name = name.to_ascii_lowercase();
    keywords
        .iter()
        .any(|k| name.contains(&k.to_ascii_lowercase()))
}

impl AnalysisConfig {
    /// Parse a JSON config file body
    pub fn from_json(text: &str) -> Result<Self, String> {
        let config: Self = serde_json::from_str(text).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        let intel = &self.intel;
        if intel.visible_threshold < 0.0 || intel.stealable_threshold < 0.0 {
            return Err("intel thresholds cannot be negative".to_string());
        }
        if intel.stealable_threshold < intel.visible_threshold {
            return Err(format!(
                "stealable_threshold ({}) cannot be below visible_threshold ({})",
                intel.stealable_threshold, intel.visible_threshold
            ));
        }
        let mc = &self.mission_control;
        if !(mc.masking_decay > 0.0 && mc.masking_decay <= 1.0) {
            return Err(format!(
                "masking_decay must be in (0, 1], got {}",
                mc.masking_decay
            ));
        }
        if let Some((name, base)) = mc.base_by_difficulty.iter().find(|(_, b)| **b <= 0.0) {
            return Err(format!("base limit for {name} must be > 0, got {base}"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config =
            AnalysisConfig::from_json(r#"{"intel": {"visible_threshold": 0.1}}"#).expect("config");
        assert_eq!(config.intel.visible_threshold, 0.1);
        assert_eq!(config.intel.stealable_threshold, 0.5);
        assert_eq!(config.spoils, SpoilsConfig::default());
    }

    #[test]
    fn stealable_below_visible_is_rejected() {
        let err = AnalysisConfig::from_json(
            r#"{"intel": {"visible_threshold": 0.6, "stealable_threshold": 0.5}}"#,
        )
        .unwrap_err();
        assert!(err.contains("stealable_threshold"));
    }

    #[test]
    fn difficulty_lookup_is_case_insensitive_with_normal_fallback() {
        let mc = MissionControlConfig::default();
        assert_eq!(mc.base_for("brutal"), 0.75);
        assert_eq!(mc.base_for("Impossible"), 1.25);
    }

    #[test]
    fn keywords_match_substrings_case_insensitively() {
        let hab = HabitatConfig::default();
        assert!(hab.is_important("OrbitalShipyardDock"));
        assert!(hab.is_mining("AdvancedMiningComplex"));
        assert!(!hab.is_mining("Farm"));
    }
}
