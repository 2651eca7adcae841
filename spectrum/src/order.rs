//! Priority orderings of vertices.

use std::cmp::Reverse;

use ordered_float::NotNan;

use crate::graph::Vertex;

/// Sorts `(vertex, priority)` pairs by descending priority. The sort is
/// stable, so equal priorities keep their relative order. NaN priorities
/// sort last.
pub fn by_descending_priority(order: &mut [(Vertex, f64)]) {
    order.sort_by_key(|&(_, priority)| Reverse(NotNan::new(priority).ok()));
}

/// Position of the first maximum of `key` over `items`.
pub(crate) fn first_max_by_key<T, K, F>(items: &[T], mut key: F) -> Option<usize>
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    let mut best: Option<(usize, K)> = None;
    for (i, item) in items.iter().enumerate() {
        let k = key(item);
        match &best {
            Some((_, b)) if k <= *b => {}
            _ => best = Some((i, k)),
        }
    }
    best.map(|(i, _)| i)
}

/// Indices of every item achieving the maximum of `key`.
pub(crate) fn all_max_by_key<T, K, F>(items: &[T], mut key: F) -> Vec<usize>
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    let mut best: Option<K> = None;
    let mut ties = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let k = key(item);
        match &best {
            Some(b) if k < *b => {}
            Some(b) if k == *b => ties.push(i),
            _ => {
                best = Some(k);
                ties.clear();
                ties.push(i);
            }
        }
    }
    ties
}
