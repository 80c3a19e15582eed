//! Dependency Resolution
//!
//! This module implements the ordering primitive shared by stages (over
//! their tasks) and the scheduler (over its stages): given a collection of
//! items with `after`/`before` constraints, produce a sequence containing
//! every item exactly once that satisfies every constraint.
//!
//! # Algorithm
//!
//! 1. Build a directed graph: for "A after B" add an edge B→A, for
//!    "A before B" add an edge A→B. A constraint naming a key that is not
//!    currently registered contributes no edge — it stays dormant and
//!    becomes a real edge automatically once the key is registered,
//!    because the order is recomputed from scratch whenever the
//!    collection changes.
//!
//! 2. Run Kahn's algorithm, always emitting the ready item with the
//!    lowest registration index. This makes the tie-break stable: items
//!    with no ordering relationship keep their registration order, so
//!    adding an unrelated task never reshuffles existing ones.
//!
//! 3. If not every item could be emitted, the graph has a cycle.
//!    Resolution fails naming a key that actually lies on a cycle, and
//!    callers keep their previously valid order.
//!
//! Resolution is O(V log V + E) and is only run when a collection's dirty
//! flag is set, not on every frame.

mod resolve;

pub use resolve::{resolve, Schedulable};
