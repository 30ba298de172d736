use crate::score::Score;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranked<T> {
    /// 1-based position
    pub rank: usize,
    pub item: T,
    pub score: Score,
}

/// Score every item and sort by descending value.
///
/// The sort is stable: equal values keep their input order.
pub fn rank<T, I, F>(items: I, mut score: F) -> Vec<Ranked<T>>
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> Score,
{
    let mut scored: Vec<(T, Score)> = items
        .into_iter()
        .map(|item| {
            let score = score(&item);
            (item, score)
        })
        .collect();
    scored.sort_by(|(_, a), (_, b)| b.value.total_cmp(&a.value));
    scored
        .into_iter()
        .enumerate()
        .map(|(idx, (item, score))| Ranked {
            rank: idx + 1,
            item,
            score,
        })
        .collect()
}
