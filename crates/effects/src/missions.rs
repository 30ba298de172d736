use crate::bag::EffectBag;
use serde::Serialize;
use std::collections::BTreeMap;

/// How many sources grant each mission.
///
/// Only counts matter here: the order in which bags list their missions is
/// irrelevant to every consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MissionCounts(BTreeMap<String, usize>);

impl MissionCounts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bags<'a, I>(bags: I) -> Self
    where
        I: IntoIterator<Item = &'a EffectBag>,
    {
        let mut counts = Self::new();
        for bag in bags {
            for mission in bag.missions() {
                counts.record(mission);
            }
        }
        counts
    }

    pub fn record(&mut self, mission: &str) {
        *self.0.entry(mission.to_string()).or_insert(0) += 1;
    }

    #[must_use]
    pub fn count(&self, mission: &str) -> usize {
        self.0.get(mission).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(name, count)| (name.as_str(), *count))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for MissionCounts {
    fn from_iter<T: IntoIterator<Item = (S, usize)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
