//! Achievement data feed: the built-in tree and the JSON loader.

use super::types::{AchievementDef, AchievementId, Position};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Problems with an achievement data feed.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("could not read achievement data {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed achievement data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate achievement id {0}")]
    DuplicateId(AchievementId),
    #[error("no root achievement (every achievement has prerequisites)")]
    NoRoot,
    #[error("more than one achievement without prerequisites: {0} and {1}")]
    MultipleRoots(AchievementId, AchievementId),
}

/// Parses a JSON array of feed records.
pub fn parse_feed(json: &str) -> Result<Vec<AchievementDef>, DataError> {
    Ok(serde_json::from_str(json)?)
}

/// Reads and parses a feed file.
pub fn load_feed(path: &Path) -> Result<Vec<AchievementDef>, DataError> {
    let json = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_feed(&json)
}

/// (id, name, description, level gain, parents, x, y)
type Row = (u32, &'static str, &'static str, u32, &'static [u32], f64, f64);

const BUILT_IN: &[Row] = &[
    (1, "First Steps", "Open the tree for the first time.", 1, &[], 0.0, 0.0),
    // Curiosity branch
    (2, "Curious Mind", "Read the description of three achievements.", 1, &[1], -220.0, -160.0),
    (3, "Cartographer", "Pan across the whole tree.", 2, &[2], -420.0, -300.0),
    (4, "Close Inspection", "Zoom in as far as the view allows.", 2, &[2], -260.0, -380.0),
    (5, "Surveyor", "Map every corner and inspect every node.", 4, &[3, 4], -420.0, -540.0),
    // Patience branch
    (6, "Steady Hand", "Hold a node until it unlocks.", 1, &[1], 220.0, -160.0),
    (7, "Second Thoughts", "Let go of a node before it unlocks.", 1, &[6], 420.0, -300.0),
    (8, "Chain Reaction", "Unlock a node that opens two others.", 3, &[6], 260.0, -380.0),
    (9, "Patience Pays", "Master holding and letting go.", 4, &[7, 8], 420.0, -540.0),
    // Persistence branch
    (10, "Coming Back", "Return to the tree in a new session.", 2, &[1], 0.0, 240.0),
    (11, "Creature of Habit", "Come back on three different days.", 3, &[10], -180.0, 420.0),
    (12, "Clean Slate", "Reset your progress and start again.", 2, &[10], 180.0, 420.0),
    // Capstones
    (13, "Explorer", "Finish the curiosity and patience branches.", 6, &[5, 9], 0.0, -700.0),
    (14, "Completionist", "Unlock everything else.", 10, &[11, 12, 13], 0.0, 620.0),
];

/// The tree used when no data file is given.
pub fn built_in_achievements() -> Vec<AchievementDef> {
    BUILT_IN
        .iter()
        .map(
            |&(id, name, description, level_up, parents, x, y)| AchievementDef {
                id: AchievementId(id),
                name: name.to_string(),
                description: description.to_string(),
                level_up,
                parents: parents.iter().copied().map(AchievementId).collect(),
                position: Position::new(x, y),
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::AchievementStore;
    use std::collections::HashSet;
    use std::io::Write;

    #[test]
    fn test_built_in_tree_is_valid() {
        let defs = built_in_achievements();
        let ids: HashSet<_> = defs.iter().map(|d| d.id).collect();
        assert_eq!(ids.len(), defs.len());
        for def in &defs {
            for parent in &def.parents {
                assert!(ids.contains(parent), "{} has unknown parent {}", def.id, parent);
            }
        }
        let store = AchievementStore::new(defs).unwrap();
        assert_eq!(store.root_id(), AchievementId(1));
    }

    #[test]
    fn test_parse_feed() {
        let defs = parse_feed(
            r#"[
                {"id": 1, "name": "Root", "description": "", "levelUp": 1, "parents": [], "position": {"x": 0, "y": 0}},
                {"id": 2, "name": "Child", "description": "d", "levelUp": 2, "parents": [1], "position": {"x": 0, "y": 50}}
            ]"#,
        )
        .unwrap();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[1].parents, vec![AchievementId(1)]);
    }

    #[test]
    fn test_parse_feed_rejects_garbage() {
        assert!(matches!(parse_feed("{not json"), Err(DataError::Parse(_))));
    }

    #[test]
    fn test_load_feed_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": 7, "name": "Only", "levelUp": 3, "position": {{"x": 1, "y": 2}}}}]"#
        )
        .unwrap();
        let defs = load_feed(file.path()).unwrap();
        assert_eq!(defs[0].id, AchievementId(7));
        assert_eq!(defs[0].level_up, 3);
    }

    #[test]
    fn test_load_feed_missing_file() {
        let err = load_feed(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
