//! Pure status evaluation for achievements and edges.

use super::edges::Edge;
use crate::achievements::{Achievement, AchievementId, AchievementStore};

/// Display status of an achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The root, not yet unlocked. Always eligible.
    StartLocked,
    /// The root, unlocked.
    StartUnlocked,
    Locked,
    Unlockable,
    Unlocked,
}

impl Status {
    /// Whether a hold on a node with this status may start.
    pub fn can_start_hold(self) -> bool {
        matches!(self, Status::StartLocked | Status::Unlockable)
    }

    pub fn is_unlocked(self) -> bool {
        matches!(self, Status::StartUnlocked | Status::Unlocked)
    }

    pub fn is_start(self) -> bool {
        matches!(self, Status::StartLocked | Status::StartUnlocked)
    }
}

/// Display status of a prerequisite edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeStatus {
    BothUnlocked,
    /// Source unlocked and the target has every prerequisite met.
    Feeding,
    Default,
}

/// Every parent resolves to an unlocked achievement. Unknown parents are
/// never satisfied.
pub fn parents_satisfied(achievement: &Achievement, store: &AchievementStore) -> bool {
    achievement
        .parents()
        .iter()
        .all(|&parent| store.is_unlocked(parent))
}

pub fn status(achievement: &Achievement, store: &AchievementStore) -> Status {
    let is_root = store.is_root(achievement.id());
    if achievement.is_unlocked() {
        return if is_root {
            Status::StartUnlocked
        } else {
            Status::Unlocked
        };
    }
    if is_root {
        return Status::StartLocked;
    }
    if parents_satisfied(achievement, store) {
        Status::Unlockable
    } else {
        Status::Locked
    }
}

/// Status by id; `None` for ids the store does not know.
pub fn status_of(id: AchievementId, store: &AchievementStore) -> Option<Status> {
    store.get(id).map(|a| status(a, store))
}

pub fn edge_status(edge: Edge, store: &AchievementStore) -> EdgeStatus {
    let (Some(source), Some(target)) = (store.get(edge.source), store.get(edge.target)) else {
        return EdgeStatus::Default;
    };
    if source.is_unlocked() && target.is_unlocked() {
        EdgeStatus::BothUnlocked
    } else if source.is_unlocked() && !target.is_unlocked() && parents_satisfied(target, store) {
        EdgeStatus::Feeding
    } else {
        EdgeStatus::Default
    }
}

/// Children of `parent` that became unlockable because `parent` is now
/// unlocked: still locked, list `parent` as a prerequisite, and have every
/// prerequisite met.
pub fn newly_unlockable_children(
    parent: AchievementId,
    store: &AchievementStore,
) -> Vec<AchievementId> {
    store
        .children_of(parent)
        .filter(|child| !child.is_unlocked() && parents_satisfied(child, store))
        .map(Achievement::id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::{AchievementDef, Position};

    fn def(id: u32, parents: &[u32]) -> AchievementDef {
        AchievementDef {
            id: AchievementId(id),
            name: id.to_string(),
            description: String::new(),
            level_up: 1,
            parents: parents.iter().copied().map(AchievementId).collect(),
            position: Position::default(),
        }
    }

    fn store() -> AchievementStore {
        AchievementStore::new(vec![
            def(1, &[]),
            def(2, &[1]),
            def(3, &[1]),
            def(4, &[2, 3]),
            def(5, &[404]),
        ])
        .unwrap()
    }

    fn status_id(store: &AchievementStore, id: u32) -> Status {
        status_of(AchievementId(id), store).unwrap()
    }

    #[test]
    fn test_initial_statuses() {
        let store = store();
        assert_eq!(status_id(&store, 1), Status::StartLocked);
        assert_eq!(status_id(&store, 2), Status::Locked);
        assert_eq!(status_id(&store, 4), Status::Locked);
        assert_eq!(status_id(&store, 5), Status::Locked);
        assert_eq!(status_of(AchievementId(99), &store), None);
    }

    #[test]
    fn test_root_unlock_makes_children_unlockable() {
        let mut store = store();
        store.unlock(AchievementId(1)).unwrap();
        assert_eq!(status_id(&store, 1), Status::StartUnlocked);
        assert_eq!(status_id(&store, 2), Status::Unlockable);
        assert_eq!(status_id(&store, 3), Status::Unlockable);
        assert_eq!(status_id(&store, 4), Status::Locked);
    }

    #[test]
    fn test_multi_parent_needs_all_parents() {
        let mut store = store();
        store.unlock(AchievementId(1)).unwrap();
        store.unlock(AchievementId(2)).unwrap();
        assert_eq!(status_id(&store, 4), Status::Locked);
        store.unlock(AchievementId(3)).unwrap();
        assert_eq!(status_id(&store, 4), Status::Unlockable);
    }

    #[test]
    fn test_dangling_parent_stays_locked() {
        let mut store = store();
        store.unlock(AchievementId(1)).unwrap();
        assert_eq!(status_id(&store, 5), Status::Locked);
    }

    #[test]
    fn test_unlocked_status_iff_flag() {
        let mut store = store();
        store.unlock(AchievementId(1)).unwrap();
        store.unlock(AchievementId(3)).unwrap();
        for achievement in store.iter() {
            let s = status(achievement, &store);
            assert_eq!(s.is_unlocked(), achievement.is_unlocked());
            assert!(!(s.is_unlocked() && s == Status::Unlockable));
        }
    }

    #[test]
    fn test_edge_statuses() {
        let mut store = store();
        let e12 = Edge::new(AchievementId(1), AchievementId(2));
        let e24 = Edge::new(AchievementId(2), AchievementId(4));
        assert_eq!(edge_status(e12, &store), EdgeStatus::Default);

        store.unlock(AchievementId(1)).unwrap();
        assert_eq!(edge_status(e12, &store), EdgeStatus::Feeding);

        store.unlock(AchievementId(2)).unwrap();
        assert_eq!(edge_status(e12, &store), EdgeStatus::BothUnlocked);
        // 4 still waits on 3
        assert_eq!(edge_status(e24, &store), EdgeStatus::Default);

        store.unlock(AchievementId(3)).unwrap();
        assert_eq!(edge_status(e24, &store), EdgeStatus::Feeding);
    }

    #[test]
    fn test_newly_unlockable_children() {
        let mut store = store();
        store.unlock(AchievementId(1)).unwrap();
        assert_eq!(
            newly_unlockable_children(AchievementId(1), &store),
            vec![AchievementId(2), AchievementId(3)]
        );

        store.unlock(AchievementId(2)).unwrap();
        assert!(newly_unlockable_children(AchievementId(2), &store).is_empty());

        store.unlock(AchievementId(3)).unwrap();
        assert_eq!(
            newly_unlockable_children(AchievementId(3), &store),
            vec![AchievementId(4)]
        );
    }

    #[test]
    fn test_hold_gate() {
        assert!(Status::StartLocked.can_start_hold());
        assert!(Status::Unlockable.can_start_hold());
        assert!(!Status::Locked.can_start_hold());
        assert!(!Status::Unlocked.can_start_hold());
        assert!(!Status::StartUnlocked.can_start_hold());
    }
}
