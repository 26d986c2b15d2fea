//! Achievement records: the static feed format and the runtime record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of an achievement, as it appears in the data feed and
/// in saved progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AchievementId(pub u32);

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Precomputed layout coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Position) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// One record of the achievement data feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementDef {
    pub id: AchievementId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "levelUp", default)]
    pub level_up: u32,
    #[serde(default)]
    pub parents: Vec<AchievementId>,
    pub position: Position,
}

/// An achievement as held by the store: its definition plus the unlocked flag.
///
/// The flag is only ever changed through [`super::AchievementStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct Achievement {
    def: AchievementDef,
    pub(crate) unlocked: bool,
}

impl Achievement {
    pub(crate) fn new(def: AchievementDef) -> Self {
        Self {
            def,
            unlocked: false,
        }
    }

    pub fn id(&self) -> AchievementId {
        self.def.id
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn description(&self) -> &str {
        &self.def.description
    }

    pub fn level_up(&self) -> u32 {
        self.def.level_up
    }

    pub fn parents(&self) -> &[AchievementId] {
        &self.def.parents
    }

    pub fn position(&self) -> Position {
        self.def.position
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn has_parent(&self, id: AchievementId) -> bool {
        self.def.parents.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_record_uses_camel_case_level_up() {
        let json = r#"{
            "id": 4,
            "name": "Night Owl",
            "description": "Stay up past midnight",
            "levelUp": 3,
            "parents": [1, 2],
            "position": {"x": 10.5, "y": -4}
        }"#;
        let def: AchievementDef = serde_json::from_str(json).unwrap();
        assert_eq!(def.id, AchievementId(4));
        assert_eq!(def.level_up, 3);
        assert_eq!(def.parents, vec![AchievementId(1), AchievementId(2)]);
        assert_eq!(def.position, Position::new(10.5, -4.0));
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{"id": 1, "name": "Start", "position": {"x": 0, "y": 0}}"#;
        let def: AchievementDef = serde_json::from_str(json).unwrap();
        assert!(def.parents.is_empty());
        assert_eq!(def.level_up, 0);
        assert!(def.description.is_empty());
    }

    #[test]
    fn test_new_achievement_starts_locked() {
        let def = AchievementDef {
            id: AchievementId(9),
            name: "x".into(),
            description: String::new(),
            level_up: 1,
            parents: vec![AchievementId(3)],
            position: Position::default(),
        };
        let achievement = Achievement::new(def);
        assert!(!achievement.is_unlocked());
        assert!(achievement.has_parent(AchievementId(3)));
        assert!(!achievement.has_parent(AchievementId(4)));
    }

    #[test]
    fn test_position_distance() {
        assert_eq!(Position::new(0.0, 0.0).distance_to(Position::new(3.0, 4.0)), 5.0);
    }
}
