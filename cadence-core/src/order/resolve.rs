//! Stable topological ordering over keyed, constrained items.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use indexmap::IndexMap;

use crate::error::ScheduleError;
use crate::key::Key;

/// An item that can participate in dependency resolution.
///
/// Implemented by both tasks (ordered within a stage) and stages (ordered
/// within the scheduler). Constraints reference sibling items by key;
/// cross-level constraints do not exist.
pub trait Schedulable {
    /// The item's unique key within its owning collection.
    fn key(&self) -> &Key;

    /// Keys of items that must run before this one.
    fn after(&self) -> &[Key];

    /// Keys of items that must run after this one.
    fn before(&self) -> &[Key];
}

/// Resolve a collection of items into a valid execution order.
///
/// The returned sequence contains every item exactly once, satisfies every
/// `after`/`before` constraint whose referenced key is registered, and
/// breaks ties by registration order (the map's insertion order).
///
/// Constraints naming unregistered keys are dormant: they contribute no
/// edge now, but callers recompute whenever the collection changes, so a
/// later registration of the key activates them.
pub fn resolve<T: Schedulable>(items: &IndexMap<Key, T>) -> Result<Vec<Key>, ScheduleError> {
    let len = items.len();
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); len];
    let mut in_degree: Vec<usize> = vec![0; len];

    for (idx, item) in items.values().enumerate() {
        // "A after B": edge B -> A.
        for dep in item.after() {
            if let Some(dep_idx) = items.get_index_of(dep.as_str()) {
                successors[dep_idx].push(idx);
                in_degree[idx] += 1;
            }
        }
        // "A before B": edge A -> B.
        for succ in item.before() {
            if let Some(succ_idx) = items.get_index_of(succ.as_str()) {
                successors[idx].push(succ_idx);
                in_degree[succ_idx] += 1;
            }
        }
    }

    // Kahn's algorithm. The ready set is a min-heap on registration index,
    // so unconstrained items come out first-registered-first.
    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|&(_, &degree)| degree == 0)
        .map(|(idx, _)| Reverse(idx))
        .collect();

    let mut order = Vec::with_capacity(len);
    while let Some(Reverse(idx)) = ready.pop() {
        order.push(idx);
        for &succ in &successors[idx] {
            in_degree[succ] -= 1;
            if in_degree[succ] == 0 {
                ready.push(Reverse(succ));
            }
        }
    }

    if order.len() < len {
        return Err(ScheduleError::CyclicDependency(cycle_member(
            items,
            &successors,
            &in_degree,
        )));
    }

    Ok(order
        .into_iter()
        .map(|idx| {
            let (key, _) = items.get_index(idx).expect("resolved index in range");
            key.clone()
        })
        .collect())
}

/// Find a key that lies on a cycle.
///
/// After Kahn's algorithm, the unemitted items are exactly those with
/// residual in-degree > 0, and every unemitted item has at least one
/// unemitted predecessor. Walking predecessors from any unemitted item
/// must therefore revisit an item, and the first revisited item lies on a
/// cycle (not merely downstream of one).
fn cycle_member<T: Schedulable>(
    items: &IndexMap<Key, T>,
    successors: &[Vec<usize>],
    in_degree: &[usize],
) -> Key {
    let len = in_degree.len();

    let mut pred = vec![usize::MAX; len];
    for node in 0..len {
        if in_degree[node] == 0 {
            continue;
        }
        for &succ in &successors[node] {
            if in_degree[succ] > 0 {
                pred[succ] = node;
            }
        }
    }

    let mut current = in_degree.iter().position(|&d| d > 0).unwrap_or(0);
    let mut seen = vec![false; len];
    while !seen[current] {
        seen[current] = true;
        let next = pred[current];
        if next == usize::MAX {
            break;
        }
        current = next;
    }

    let (key, _) = items.get_index(current).expect("cycle index in range");
    key.clone()
}
