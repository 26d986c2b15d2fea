//! Prerequisite edges derived from the parent lists.

use crate::achievements::{AchievementId, AchievementStore};

/// A (parent, child) pair. Identified by the pair itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub source: AchievementId,
    pub target: AchievementId,
}

impl Edge {
    pub const fn new(source: AchievementId, target: AchievementId) -> Self {
        Self { source, target }
    }
}

/// Every edge whose parent exists, in feed order. Dangling parents produce
/// no edge.
pub fn edges(store: &AchievementStore) -> Vec<Edge> {
    store
        .iter()
        .flat_map(|child| {
            child
                .parents()
                .iter()
                .filter(|parent| store.get(**parent).is_some())
                .map(move |&parent| Edge::new(parent, child.id()))
        })
        .collect()
}
