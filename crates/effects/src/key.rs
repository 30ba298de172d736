use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Grouping used for display and for deciding which keys a caller may clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectGroup {
    Attribute,
    Income,
    Cost,
    PriorityBonus,
    Misc,
}

macro_rules! effect_keys {
    ($( $variant:ident => $name:literal, $label:literal, $group:ident; )+) => {
        /// Closed set of scalar effect keys.
        ///
        /// Declaration order is the canonical order: scoring details and
        /// serialized bags list keys in this order.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum EffectKey {
            $( $variant, )+
        }

        impl EffectKey {
            pub const ALL: &'static [EffectKey] = &[ $( EffectKey::$variant, )+ ];

            /// Field name as it appears in template files and weight files.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( EffectKey::$variant => $name, )+
                }
            }

            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $( EffectKey::$variant => $label, )+
                }
            }

            #[must_use]
            pub const fn group(self) -> EffectGroup {
                match self {
                    $( EffectKey::$variant => EffectGroup::$group, )+
                }
            }
        }
    };
}

effect_keys! {
    Persuasion => "persuasion", "Persuasion", Attribute;
    Investigation => "investigation", "Investigation", Attribute;
    Espionage => "espionage", "Espionage", Attribute;
    Command => "command", "Command", Attribute;
    Administration => "administration", "Administration", Attribute;
    Science => "science", "Science", Attribute;
    Security => "security", "Security", Attribute;
    Loyalty => "loyalty", "Loyalty", Attribute;

    IncomeMoney => "incomeMoney", "Money income", Income;
    IncomeInfluence => "incomeInfluence", "Influence income", Income;
    IncomeOps => "incomeOps", "Ops income", Income;
    IncomeBoost => "incomeBoost", "Boost income", Income;
    IncomeMissionControl => "incomeMissionControl", "Mission control", Income;
    IncomeResearch => "incomeResearch", "Research income", Income;
    IncomeProjects => "incomeProjects", "Project capacity", Income;
    IncomeWater => "incomeWater", "Water income", Income;
    IncomeVolatiles => "incomeVolatiles", "Volatiles income", Income;
    IncomeMetals => "incomeMetals", "Metals income", Income;
    IncomeNobleMetals => "incomeNobleMetals", "Noble metals income", Income;
    IncomeFissiles => "incomeFissiles", "Fissiles income", Income;

    CostMoney => "costMoney", "Money cost", Cost;
    CostInfluence => "costInfluence", "Influence cost", Cost;
    CostOps => "costOps", "Ops cost", Cost;
    CostBoost => "costBoost", "Boost cost", Cost;

    EconomyBonus => "economyBonus", "Economy priority", PriorityBonus;
    WelfareBonus => "welfareBonus", "Welfare priority", PriorityBonus;
    EnvironmentBonus => "environmentBonus", "Environment priority", PriorityBonus;
    KnowledgeBonus => "knowledgeBonus", "Knowledge priority", PriorityBonus;
    GovernmentBonus => "governmentBonus", "Government priority", PriorityBonus;
    UnityBonus => "unityBonus", "Unity priority", PriorityBonus;
    MilitaryBonus => "militaryBonus", "Military priority", PriorityBonus;
    OppressionBonus => "oppressionBonus", "Oppression priority", PriorityBonus;
    SpoilsBonus => "spoilsBonus", "Spoils priority", PriorityBonus;
    SpaceDevBonus => "spaceDevBonus", "Space development priority", PriorityBonus;
    SpaceflightBonus => "spaceflightBonus", "Spaceflight priority", PriorityBonus;
    MissionControlBonus => "missionControlBonus", "Mission control priority", PriorityBonus;

    XpModifier => "xpModifier", "XP modifier", Misc;
    Tier => "tier", "Tier", Misc;
}

static BY_NAME: Lazy<HashMap<String, EffectKey>> = Lazy::new(|| {
    EffectKey::ALL
        .iter()
        .map(|key| (key.as_str().to_ascii_lowercase(), *key))
        .collect()
});

impl EffectKey {
    /// The seven attributes that are clamped at zero when scoring councilors.
    pub const CORE_ATTRIBUTES: [EffectKey; 7] = [
        EffectKey::Persuasion,
        EffectKey::Investigation,
        EffectKey::Espionage,
        EffectKey::Command,
        EffectKey::Administration,
        EffectKey::Science,
        EffectKey::Security,
    ];

    /// Case-insensitive lookup by field name. Unknown names yield `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        BY_NAME.get(&name.to_ascii_lowercase()).copied()
    }

    #[must_use]
    pub fn is_core_attribute(self) -> bool {
        Self::CORE_ATTRIBUTES.contains(&self)
    }

    /// Priority-bonus key for a priority name such as `"Economy"` or `"spoils"`.
    #[must_use]
    pub fn for_priority(priority: &str) -> Option<Self> {
        Self::from_name(&format!("{priority}Bonus"))
            .filter(|key| key.group() == EffectGroup::PriorityBonus)
    }
}

impl fmt::Display for EffectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EffectKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EffectKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_name(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown effect key `{raw}`")))
    }
}
