//! Per-stage best scores kept in a string-keyed store.
//!
//! The table lives under a single key as a JSON array with one integer per
//! stage. Anything else found under that key is treated as "no scores yet".

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::constants::HIGH_SCORE_KEY;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access score file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode score file: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Minimal get/set string store, the shape of browser local storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Store that forgets everything when dropped
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// JSON object of key -> string on disk, rewritten on every `set`
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens `path`, starting empty if the file is missing or unreadable
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "Ignoring unreadable score file");
                BTreeMap::new()
            }),
            Err(err) => {
                debug!(path = %path.display(), error = %err, "No score file yet");
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        let json = serde_json::to_string_pretty(&self.entries)?;
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&self.path, json).map_err(io_err)
    }
}

/// Best score per stage, loaded once and written back on every new record
pub struct HighScores {
    scores: Vec<u32>,
    store: Box<dyn KeyValueStore>,
}

impl HighScores {
    /// Reads the table from `store`; missing, malformed or wrong-length data
    /// yields all zeros.
    pub fn load(store: Box<dyn KeyValueStore>, stage_count: usize) -> Self {
        let scores = store
            .get(HIGH_SCORE_KEY)
            .and_then(|raw| parse_scores(&raw, stage_count))
            .unwrap_or_else(|| vec![0; stage_count]);
        Self { scores, store }
    }

    pub fn get(&self, stage: usize) -> u32 {
        self.scores.get(stage).copied().unwrap_or(0)
    }

    pub fn all(&self) -> &[u32] {
        &self.scores
    }

    /// Keeps `score` if it beats the stage's best. Returns true on a new record.
    pub fn record(&mut self, stage: usize, score: u32) -> bool {
        let Some(best) = self.scores.get_mut(stage) else {
            return false;
        };
        if score <= *best {
            return false;
        }
        *best = score;
        info!(stage = stage + 1, score, "New stage high score");
        self.save();
        true
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    fn save(&mut self) {
        let encoded = match serde_json::to_string(&self.scores) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!(error = %err, "Failed to encode high scores");
                return;
            }
        };
        if let Err(err) = self.store.set(HIGH_SCORE_KEY, encoded) {
            warn!(error = %err, "Failed to save high scores");
        }
    }
}

fn parse_scores(raw: &str, stage_count: usize) -> Option<Vec<u32>> {
    match serde_json::from_str::<Vec<u32>>(raw) {
        Ok(scores) if scores.len() == stage_count => Some(scores),
        Ok(scores) => {
            warn!(
                found = scores.len(),
                expected = stage_count,
                "High score table has the wrong length, resetting"
            );
            None
        }
        Err(err) => {
            warn!(error = %err, "High score table is malformed, resetting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_from(raw: &str) -> HighScores {
        HighScores::load(Box::new(MemoryStore::with_entry(HIGH_SCORE_KEY, raw)), 3)
    }

    #[test]
    fn test_load_valid_table() {
        let scores = load_from("[1200, 0, 5400]");
        assert_eq!(scores.all(), &[1200, 0, 5400]);
    }

    #[test]
    fn test_load_missing_defaults_to_zero() {
        let scores = HighScores::load(Box::new(MemoryStore::new()), 3);
        assert_eq!(scores.all(), &[0, 0, 0]);
    }

    #[test]
    fn test_load_bad_shapes_default_to_zero() {
        for raw in [
            "",
            "not json",
            "{\"a\": 1}",
            "42",
            "[1, 2]",
            "[1, 2, 3, 4]",
            "[\"1\", 2, 3]",
            "[-5, 2, 3]",
            "null",
        ] {
            assert_eq!(load_from(raw).all(), &[0, 0, 0], "input {raw:?}");
        }
    }

    #[test]
    fn test_record_only_on_strict_improvement() {
        let mut scores = load_from("[100, 0, 0]");
        assert!(!scores.record(0, 100));
        assert!(!scores.record(0, 50));
        assert_eq!(scores.get(0), 100);

        assert!(scores.record(0, 101));
        assert_eq!(scores.get(0), 101);
        assert_eq!(
            scores.store().get(HIGH_SCORE_KEY).as_deref(),
            Some("[101,0,0]")
        );
    }

    #[test]
    fn test_record_out_of_range_stage_ignored() {
        let mut scores = load_from("[0, 0, 0]");
        assert!(!scores.record(7, 999));
        assert_eq!(scores.all(), &[0, 0, 0]);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("scores.json");

        let mut store = FileStore::open(&path);
        assert_eq!(store.path(), path.as_path());
        assert!(store.get(HIGH_SCORE_KEY).is_none());
        store
            .set(HIGH_SCORE_KEY, "[1,2,3]".to_string())
            .expect("write scores");

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get(HIGH_SCORE_KEY).as_deref(), Some("[1,2,3]"));
    }

    #[test]
    fn test_file_store_ignores_corrupt_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scores.json");
        fs::write(&path, "{{{ definitely not json").expect("write corrupt file");

        let store = FileStore::open(&path);
        let scores = HighScores::load(Box::new(store), 3);
        assert_eq!(scores.all(), &[0, 0, 0]);
    }

    // Property-based tests
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_high_score_never_decreases(
                attempts in prop::collection::vec((0usize..3, 0u32..5000), 0..50)
            ) {
                let mut scores = HighScores::load(Box::new(MemoryStore::new()), 3);
                for (stage, score) in attempts {
                    let before = scores.get(stage);
                    scores.record(stage, score);
                    prop_assert_eq!(scores.get(stage), before.max(score));
                }
            }
        }
    }
}
