//! Progress persistence: a key-value capability and the adapter that stores
//! the unlocked ids and level through it.

use super::types::AchievementId;
use crate::constants::{KEY_LEVEL, KEY_UNLOCKED, PROGRESS_FILE_NAME};
use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// String key-value storage. Writes replace several keys at once so a
/// snapshot is never half-applied.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set_all(&mut self, entries: &[(&str, String)]) -> io::Result<()>;
}

/// Platform data directory for this application.
pub fn data_dir() -> io::Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "unlocktree").ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "Could not determine data directory")
    })?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Keys kept in a single JSON object file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing or unreadable file is treated as
    /// an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring malformed progress file");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, values }
    }

    /// Opens `progress.json` in the platform data directory.
    pub fn open_default() -> io::Result<Self> {
        Ok(Self::open(data_dir()?.join(PROGRESS_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_snapshot(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.values)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        // Write beside the target, then rename over it
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_all(&mut self, entries: &[(&str, String)]) -> io::Result<()> {
        let previous = self.values.clone();
        for (key, value) in entries {
            self.values.insert((*key).to_string(), value.clone());
        }
        let result = self.write_snapshot();
        if result.is_err() {
            self.values = previous;
        }
        result
    }
}

/// In-memory store. Counts successful writes; can be told to fail.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
    writes: usize,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_all(&mut self, entries: &[(&str, String)]) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::Other, "writes disabled"));
        }
        for (key, value) in entries {
            self.values.insert((*key).to_string(), value.clone());
        }
        self.writes += 1;
        Ok(())
    }
}

/// Saved progress: which achievements are unlocked and the level total.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Progress {
    pub unlocked: Vec<AchievementId>,
    pub level: u32,
}

/// Reads and writes [`Progress`] through a [`KeyValueStore`].
#[derive(Debug)]
pub struct ProgressAdapter<K> {
    backend: K,
}

impl<K: KeyValueStore> ProgressAdapter<K> {
    pub fn new(backend: K) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &K {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut K {
        &mut self.backend
    }

    /// Loads saved progress. Missing or malformed values fall back to an
    /// empty list and a zero level.
    pub fn load(&self) -> Progress {
        let unlocked = match self.backend.get(KEY_UNLOCKED) {
            Some(raw) => serde_json::from_str::<Vec<AchievementId>>(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "ignoring malformed unlocked list");
                Vec::new()
            }),
            None => Vec::new(),
        };
        let level = match self.backend.get(KEY_LEVEL) {
            Some(raw) => raw.trim().parse::<u32>().unwrap_or_else(|_| {
                warn!(value = %raw, "ignoring malformed level");
                0
            }),
            None => 0,
        };
        Progress { unlocked, level }
    }

    /// Writes both keys as one snapshot.
    pub fn save(&mut self, progress: &Progress) -> io::Result<()> {
        let unlocked = serde_json::to_string(&progress.unlocked)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.backend.set_all(&[
            (KEY_UNLOCKED, unlocked),
            (KEY_LEVEL, progress.level.to_string()),
        ])
    }

    /// Overwrites saved progress with an empty snapshot.
    pub fn clear(&mut self) -> io::Result<()> {
        self.save(&Progress::default())
    }
}
