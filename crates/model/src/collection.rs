use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// A normalized record with an id unique within its kind
pub trait Record {
    type Id: Copy + Eq + Ord + Hash + Debug;

    /// Collection name without the type namespace, e.g. `TIFactionState`
    const KIND: &'static str;

    fn id(&self) -> Self::Id;
}

/// Id-keyed lookup table, built once per analysis and never mutated.
///
/// Records are stored sorted by id, so iteration order is deterministic.
#[derive(Debug, Clone)]
pub struct Collection<R: Record> {
    records: Vec<R>,
    index: HashMap<R::Id, usize>,
}

impl<R: Record> Default for Collection<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<R: Record> Collection<R> {
    /// Build from records in any order. Of two records sharing an id the
    /// later one is kept.
    pub fn new(records: Vec<R>) -> Self {
        let mut by_id: Vec<(usize, R)> = records.into_iter().enumerate().collect();
        by_id.sort_by(|(ia, a), (ib, b)| a.id().cmp(&b.id()).then(ia.cmp(ib)));

        let mut kept: Vec<R> = Vec::with_capacity(by_id.len());
        for (_, record) in by_id {
            if kept.last().is_some_and(|prev| prev.id() == record.id()) {
                log::warn!("Duplicate {} id {:?}; keeping the later record", R::KIND, record.id());
                kept.pop();
            }
            kept.push(record);
        }

        let index = kept
            .iter()
            .enumerate()
            .map(|(pos, record)| (record.id(), pos))
            .collect();
        Self {
            records: kept,
            index,
        }
    }

    #[must_use]
    pub fn get(&self, id: R::Id) -> Option<&R> {
        self.index.get(&id).map(|pos| &self.records[*pos])
    }

    #[must_use]
    pub fn contains(&self, id: R::Id) -> bool {
        self.index.contains_key(&id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Resolve a list of ids in the given order, skipping ones that are not
    /// present
    pub fn resolve<'i>(&self, ids: impl IntoIterator<Item = &'i R::Id>) -> Vec<&R>
    where
        R::Id: 'i,
    {
        ids.into_iter().filter_map(|id| self.get(*id)).collect()
    }
}

impl<'a, R: Record> IntoIterator for &'a Collection<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<R: Record + Serialize> Serialize for Collection<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(u64, &'static str);

    impl Record for Row {
        type Id = u64;
        const KIND: &'static str = "TIRowState";

        fn id(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn sorted_by_id_with_index() {
        let rows = Collection::new(vec![Row(9, "c"), Row(2, "a"), Row(5, "b")]);
        let ids: Vec<u64> = rows.iter().map(|r| r.0).collect();
        assert_eq!(ids, vec![2, 5, 9]);
        assert_eq!(rows.get(5).map(|r| r.1), Some("b"));
        assert!(rows.get(4).is_none());
    }

    #[test]
    fn duplicate_ids_keep_the_later_record() {
        let rows = Collection::new(vec![Row(1, "first"), Row(0, "x"), Row(1, "second")]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.get(1).map(|r| r.1), Some("second"));
    }

    #[test]
    fn resolve_skips_unknown_ids() {
        let rows = Collection::new(vec![Row(1, "a"), Row(2, "b")]);
        let names: Vec<_> = rows.resolve(&[2, 7, 1]).into_iter().map(|r| r.1).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
