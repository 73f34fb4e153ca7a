//! Dependency graph helpers shared by interactables and interactors
//!
//! Edges point from a master to its dependents. The world stores each
//! entity's outgoing edges; these helpers only see them through a lookup
//! closure so the same code serves both entity kinds.

use std::hash::Hash;

use ahash::AHashSet;

/// Would adding `master -> dependent` close a cycle?
///
/// True when `master` is reachable from `dependent` over existing edges,
/// or when both are the same entity.
pub fn would_form_cycle<Id, F, I>(master: Id, dependent: Id, edges: F) -> bool
where
    Id: Copy + Eq + Hash,
    F: Fn(Id) -> I,
    I: IntoIterator<Item = Id>,
{
    if master == dependent {
        return true;
    }

    let mut visited = AHashSet::new();
    let mut stack = vec![dependent];
    while let Some(node) = stack.pop() {
        if node == master {
            return true;
        }
        if !visited.insert(node) {
            continue;
        }
        stack.extend(edges(node));
    }
    false
}

/// Weight of a dependent held down by its masters
///
/// Stays strictly below every master and never rises above the
/// dependent's own base weight. The result saturates at `i32::MIN`, so a
/// master already at `i32::MIN` cannot be undercut; interactable weights are
/// kept at or above [`crate::interactable::MIN_WEIGHT`] for that reason.
pub fn clamped_weight(base: i32, master_weights: impl IntoIterator<Item = i32>) -> i32 {
    master_weights
        .into_iter()
        .map(|w| w.saturating_sub(1))
        .fold(base, i32::min)
}
