//! Typed template records.
//!
//! Every record keeps its unrecognized fields in `fields`; numeric ones whose
//! names match an [`EffectKey`](strategist_effects::EffectKey) become effect
//! scalars, the rest are ignored.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use strategist_effects::EffectBag;

fn scalar_effects(fields: &BTreeMap<String, Value>) -> EffectBag {
    EffectBag::from_fields(
        fields
            .iter()
            .filter_map(|(name, value)| value.as_f64().map(|v| (name.as_str(), v))),
    )
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechBonusEntry {
    pub category: String,
    #[serde(default)]
    pub bonus: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgTemplate {
    pub data_name: String,
    #[serde(default, alias = "tradeable")]
    pub tradable: bool,
    #[serde(default)]
    pub tech_bonuses: Vec<TechBonusEntry>,
    #[serde(default)]
    pub missions_grant: Vec<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl OrgTemplate {
    /// Scalar effects declared on the template, tier included
    #[must_use]
    pub fn scalar_effects(&self) -> EffectBag {
        scalar_effects(&self.fields)
    }

    /// Scalars plus tech bonuses and granted missions
    #[must_use]
    pub fn effects(&self) -> EffectBag {
        let mut bag = self.scalar_effects();
        for entry in &self.tech_bonuses {
            bag.add_tech_bonus(&entry.category, entry.bonus);
        }
        for mission in &self.missions_grant {
            bag.grant_mission(mission.clone());
        }
        bag
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum StatOperation {
    #[default]
    Additive,
    /// Overwrite the stat with the value of `source_stat`
    #[serde(alias = "SetToOtherStat")]
    SetToStat,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatMod {
    pub stat: String,
    #[serde(default)]
    pub operation: StatOperation,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub source_stat: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityBonus {
    pub priority: String,
    #[serde(default)]
    pub bonus: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitTemplate {
    pub data_name: String,
    #[serde(default)]
    pub augmentation: bool,
    #[serde(default)]
    pub stat_mods: Vec<StatMod>,
    #[serde(default)]
    pub priority_bonuses: Vec<PriorityBonus>,
    #[serde(default)]
    pub missions_grant: Vec<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl TraitTemplate {
    /// Direct scalar fields such as `incomeMoney`
    #[must_use]
    pub fn scalar_effects(&self) -> EffectBag {
        scalar_effects(&self.fields)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabModuleTemplate {
    pub data_name: String,
    #[serde(default)]
    pub home_orbit_bonus: BTreeMap<String, f64>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl HabModuleTemplate {
    #[must_use]
    pub fn effects(&self) -> EffectBag {
        scalar_effects(&self.fields)
    }

    /// Extra effects granted only in the home planet's near orbit
    #[must_use]
    pub fn home_orbit_effects(&self) -> EffectBag {
        EffectBag::from_fields(
            self.home_orbit_bonus
                .iter()
                .map(|(name, value)| (name.as_str(), *value)),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouncilorTypeTemplate {
    pub data_name: String,
    #[serde(default)]
    pub mission_names: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechTemplate {
    pub data_name: String,
    #[serde(default, alias = "category")]
    pub tech_category: String,
    #[serde(default)]
    pub research_cost: f64,
    #[serde(default)]
    pub prereqs: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTemplate {
    pub data_name: String,
    #[serde(default, alias = "category")]
    pub tech_category: String,
    #[serde(default)]
    pub research_cost: f64,
    #[serde(default)]
    pub prereqs: Vec<String>,
    #[serde(default)]
    pub repeatable: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionTemplate {
    pub data_name: String,
}

/// Access to the `dataName` every template record carries
pub trait Named {
    fn data_name(&self) -> &str;
}

macro_rules! named {
    ($($ty:ty),+ $(,)?) => {
        $(impl Named for $ty {
            fn data_name(&self) -> &str {
                &self.data_name
            }
        })+
    };
}

named!(
    OrgTemplate,
    TraitTemplate,
    HabModuleTemplate,
    CouncilorTypeTemplate,
    TechTemplate,
    ProjectTemplate,
    MissionTemplate,
);
