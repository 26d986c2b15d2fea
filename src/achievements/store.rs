//! The achievement repository: static definitions plus unlocked flags and
//! the running level.

use super::data::DataError;
use super::persistence::Progress;
use super::types::{Achievement, AchievementDef, AchievementId};
use crate::graph::eligibility::{self, Status};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, warn};

/// Why an unlock was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UnlockError {
    #[error("unknown achievement {0}")]
    Unknown(AchievementId),
    #[error("achievement {0} is already unlocked")]
    AlreadyUnlocked(AchievementId),
    #[error("achievement {0} still has locked prerequisites")]
    NotEligible(AchievementId),
}

/// Owns every achievement. The id lookup is built once; entries are never
/// added or removed afterwards.
#[derive(Debug, Clone)]
pub struct AchievementStore {
    achievements: Vec<Achievement>,
    index: HashMap<AchievementId, usize>,
    root: AchievementId,
    level: u32,
}

impl AchievementStore {
    /// Builds the store from feed records, rejecting duplicate ids and
    /// requiring exactly one parentless root.
    pub fn new(defs: Vec<AchievementDef>) -> Result<Self, DataError> {
        let mut index = HashMap::with_capacity(defs.len());
        let mut root = None;

        for (i, def) in defs.iter().enumerate() {
            if index.insert(def.id, i).is_some() {
                return Err(DataError::DuplicateId(def.id));
            }
            if def.parents.is_empty() {
                if let Some(first) = root {
                    return Err(DataError::MultipleRoots(first, def.id));
                }
                root = Some(def.id);
            }
        }
        let root = root.ok_or(DataError::NoRoot)?;

        for def in &defs {
            for parent in &def.parents {
                if !index.contains_key(parent) {
                    warn!(achievement = %def.id, parent = %parent, "dangling prerequisite, achievement will stay locked");
                }
            }
        }

        Ok(Self {
            achievements: defs.into_iter().map(Achievement::new).collect(),
            index,
            root,
            level: 0,
        })
    }

    pub fn get(&self, id: AchievementId) -> Option<&Achievement> {
        self.index.get(&id).map(|&i| &self.achievements[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Achievement> {
        self.achievements.iter()
    }

    pub fn len(&self) -> usize {
        self.achievements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.achievements.is_empty()
    }

    pub fn root_id(&self) -> AchievementId {
        self.root
    }

    pub fn is_root(&self, id: AchievementId) -> bool {
        self.root == id
    }

    /// Unknown ids count as locked.
    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.get(id).is_some_and(Achievement::is_unlocked)
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }

    /// Direct children of `id`, in feed order.
    pub fn children_of(&self, id: AchievementId) -> impl Iterator<Item = &Achievement> {
        self.achievements.iter().filter(move |a| a.has_parent(id))
    }

    /// Unlocked ids in ascending order.
    pub fn unlocked_ids(&self) -> Vec<AchievementId> {
        let mut ids: Vec<_> = self
            .achievements
            .iter()
            .filter(|a| a.unlocked)
            .map(Achievement::id)
            .collect();
        ids.sort();
        ids
    }

    /// Unlocks an eligible achievement and adds its level gain to the running
    /// level. This is the only way an achievement becomes unlocked during a
    /// session. Returns the level gained.
    pub fn unlock(&mut self, id: AchievementId) -> Result<u32, UnlockError> {
        let achievement = self.get(id).ok_or(UnlockError::Unknown(id))?;
        match eligibility::status(achievement, self) {
            Status::StartUnlocked | Status::Unlocked => Err(UnlockError::AlreadyUnlocked(id)),
            Status::Locked => Err(UnlockError::NotEligible(id)),
            Status::StartLocked | Status::Unlockable => {
                let i = self.index[&id];
                let gain = self.achievements[i].level_up();
                self.achievements[i].unlocked = true;
                self.level = self.level.saturating_add(gain);
                Ok(gain)
            }
        }
    }

    /// Seeds flags and level from saved progress. Ids the store does not
    /// know about are ignored.
    pub fn restore(&mut self, progress: &Progress) {
        let saved: HashSet<AchievementId> = progress.unlocked.iter().copied().collect();
        for achievement in &mut self.achievements {
            achievement.unlocked = saved.contains(&achievement.id());
        }
        let unknown = saved
            .iter()
            .filter(|id| !self.index.contains_key(*id))
            .count();
        if unknown > 0 {
            debug!(unknown, "ignored saved ids with no matching achievement");
        }
        self.level = progress.level;
    }

    /// Clears every unlocked flag and zeroes the level.
    pub fn reset(&mut self) {
        for achievement in &mut self.achievements {
            achievement.unlocked = false;
        }
        self.level = 0;
    }

    /// Full snapshot of the persisted part of the store.
    pub fn progress(&self) -> Progress {
        Progress {
            unlocked: self.unlocked_ids(),
            level: self.level,
        }
    }
}
