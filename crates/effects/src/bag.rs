use crate::key::EffectKey;
use serde::Serialize;
use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Research bonus toward one tech category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TechBonus {
    pub category: String,
    pub bonus: f64,
}

impl TechBonus {
    pub fn new(category: impl Into<String>, bonus: f64) -> Self {
        Self {
            category: category.into(),
            bonus,
        }
    }
}

/// Sparse additive record of game effects.
///
/// Scalars are stored only when non-zero, so two bags that read the same for
/// every key compare equal. Tech bonuses hold at most one entry per category
/// (in first-encounter order). Granted missions keep duplicates: two sources
/// for the same mission are counted separately downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectBag {
    #[serde(flatten)]
    scalars: BTreeMap<EffectKey, f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tech_bonuses: Vec<TechBonus>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    missions: Vec<String>,
}

impl EffectBag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bag from `(field name, value)` pairs. Names that are not effect
    /// keys are skipped.
    pub fn from_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut bag = Self::new();
        for (name, value) in fields {
            match EffectKey::from_name(name) {
                Some(key) => Self::add(&mut bag, key, value),
                None => log::trace!("ignoring non-effect field `{name}`"),
            }
        }
        bag
    }

    #[must_use]
    pub fn get(&self, key: EffectKey) -> f64 {
        self.scalars.get(&key).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, key: EffectKey, value: f64) {
        if value == 0.0 {
            self.scalars.remove(&key);
        } else {
            self.scalars.insert(key, value);
        }
    }

    pub fn add(&mut self, key: EffectKey, value: f64) {
        let next = self.get(key) + value;
        self.set(key, next);
    }

    #[must_use]
    pub fn with(mut self, key: EffectKey, value: f64) -> Self {
        Self::add(&mut self, key, value);
        self
    }

    /// Non-zero scalars in canonical key order.
    pub fn scalars(&self) -> impl Iterator<Item = (EffectKey, f64)> + '_ {
        self.scalars.iter().map(|(key, value)| (*key, *value))
    }

    #[must_use]
    pub fn tech_bonuses(&self) -> &[TechBonus] {
        &self.tech_bonuses
    }

    #[must_use]
    pub fn tech_bonus(&self, category: &str) -> f64 {
        self.tech_bonuses
            .iter()
            .find(|t| t.category == category)
            .map_or(0.0, |t| t.bonus)
    }

    pub fn add_tech_bonus(&mut self, category: &str, bonus: f64) {
        match self
            .tech_bonuses
            .iter_mut()
            .find(|t| t.category == category)
        {
            Some(existing) => existing.bonus += bonus,
            None => self.tech_bonuses.push(TechBonus::new(category, bonus)),
        }
    }

    #[must_use]
    pub fn missions(&self) -> &[String] {
        &self.missions
    }

    pub fn grant_mission(&mut self, mission: impl Into<String>) {
        self.missions.push(mission.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty() && self.tech_bonuses.is_empty() && self.missions.is_empty()
    }

    /// Associative combination: scalars add, tech bonuses merge by category,
    /// missions concatenate (`self` first).
    #[must_use]
    pub fn combine(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.absorb(other);
        out
    }

    /// In-place form of [`EffectBag::combine`].
    pub fn absorb(&mut self, other: &Self) {
        for (key, value) in other.scalars() {
            self.add(key, value);
        }
        for tech in &other.tech_bonuses {
            self.add_tech_bonus(&tech.category, tech.bonus);
        }
        self.missions.extend(other.missions.iter().cloned());
    }
}

impl Add for EffectBag {
    type Output = EffectBag;

    fn add(mut self, rhs: EffectBag) -> EffectBag {
        self.absorb(&rhs);
        self
    }
}

impl<'a> Add<&'a EffectBag> for EffectBag {
    type Output = EffectBag;

    fn add(mut self, rhs: &'a EffectBag) -> EffectBag {
        self.absorb(rhs);
        self
    }
}

impl AddAssign<&EffectBag> for EffectBag {
    fn add_assign(&mut self, rhs: &EffectBag) {
        self.absorb(rhs);
    }
}

impl Sum for EffectBag {
    fn sum<I: Iterator<Item = EffectBag>>(iter: I) -> Self {
        iter.fold(EffectBag::new(), |acc, bag| acc + bag)
    }
}

impl<'a> Sum<&'a EffectBag> for EffectBag {
    fn sum<I: Iterator<Item = &'a EffectBag>>(iter: I) -> Self {
        iter.fold(EffectBag::new(), |acc, bag| acc + bag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> EffectBag {
        let mut bag = EffectBag::new()
            .with(EffectKey::Command, 2.0)
            .with(EffectKey::IncomeMoney, 15.0);
        bag.add_tech_bonus("Energy", 0.1);
        bag.grant_mission("Recruit");
        bag
    }

    #[test]
    fn empty_bag_is_identity() {
        let x = sample();
        assert_eq!(EffectBag::new().combine(&x), x);
        assert_eq!(x.combine(&EffectBag::new()), x);
    }

    #[test]
    fn scalars_add_and_zeroes_vanish() {
        let a = EffectBag::new().with(EffectKey::Command, 2.0);
        let b = EffectBag::new().with(EffectKey::Command, -2.0);
        let sum = a.combine(&b);
        assert_eq!(sum.get(EffectKey::Command), 0.0);
        assert!(sum.is_empty());
    }

    #[test]
    fn tech_bonuses_fold_by_category_in_first_seen_order() {
        let mut a = EffectBag::new();
        a.add_tech_bonus("Energy", 0.1);
        a.add_tech_bonus("Materials", 0.05);
        let mut b = EffectBag::new();
        b.add_tech_bonus("Materials", 0.05);
        b.add_tech_bonus("Xenology", 0.2);

        let sum = a.combine(&b);
        let categories: Vec<&str> = sum
            .tech_bonuses()
            .iter()
            .map(|t| t.category.as_str())
            .collect();
        assert_eq!(categories, vec!["Energy", "Materials", "Xenology"]);
        assert!((sum.tech_bonus("Materials") - 0.1).abs() < 1e-12);
    }

    #[test]
    fn missions_concatenate_with_duplicates() {
        let mut a = EffectBag::new();
        a.grant_mission("Control");
        let mut b = EffectBag::new();
        b.grant_mission("Control");
        b.grant_mission("Purge");

        assert_eq!(a.combine(&b).missions(), ["Control", "Control", "Purge"]);
        assert_eq!(b.combine(&a).missions(), ["Control", "Purge", "Control"]);
    }

    #[test]
    fn from_fields_skips_unknown_names() {
        let bag = EffectBag::from_fields([("command", 3.0), ("dataName", 1.0), ("Science", 1.0)]);
        assert_eq!(bag.get(EffectKey::Command), 3.0);
        assert_eq!(bag.get(EffectKey::Science), 1.0);
        assert_eq!(bag.scalars().count(), 2);
    }

    #[test]
    fn serializes_flat_and_sparse() {
        let json = serde_json::to_value(sample()).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "command": 2.0,
                "incomeMoney": 15.0,
                "techBonuses": [{"category": "Energy", "bonus": 0.1}],
                "missions": ["Recruit"],
            })
        );
    }

    #[test]
    fn sum_of_bags() {
        let bags = vec![sample(), sample(), EffectBag::new()];
        let total: EffectBag = bags.iter().sum();
        assert_eq!(total.get(EffectKey::Command), 4.0);
        assert_eq!(total.missions().len(), 2);
        assert!((total.tech_bonus("Energy") - 0.2).abs() < 1e-12);
    }
}
