use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;

const APP_DIR_NAME: &str = "neon-snake";
const SCORE_FILE_NAME: &str = "scores.json";

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ScoreFile {
    high_score: u32,
}

/// Durable slot holding the best score ever reached.
pub trait HighScoreStore {
    /// Returns the stored score, or 0 when nothing was stored yet.
    fn load(&self) -> Result<u32, ScoreError>;

    fn save(&mut self, score: u32) -> Result<(), ScoreError>;
}

/// Returns the platform-correct score file path.
#[must_use]
pub fn scores_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SCORE_FILE_NAME);
    base
}

/// JSON file store, `{"high_score": N}`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the default per-user data location.
    #[must_use]
    pub fn at_default_location() -> Self {
        Self::new(scores_path())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&self) -> Result<u32, ScoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let file: ScoreFile = serde_json::from_str(&raw)?;
        Ok(file.high_score)
    }

    /// Creates parent directories when needed.
    fn save(&mut self, score: u32) -> Result<(), ScoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&ScoreFile { high_score: score })?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory store for tests and `--no-save` runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryStore {
    pub high_score: u32,
    pub saves: u32,
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<u32, ScoreError> {
        Ok(self.high_score)
    }

    fn save(&mut self, score: u32) -> Result<(), ScoreError> {
        self.high_score = score;
        self.saves += 1;
        Ok(())
    }
}

/// Running session score plus the all-time maximum.
///
/// The high score only ever grows and survives `reset_session`.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct ScoreTracker {
    session_score: u32,
    high_score: u32,
}

impl ScoreTracker {
    #[must_use]
    pub fn new(high_score: u32) -> Self {
        Self {
            session_score: 0,
            high_score,
        }
    }

    /// Adds `delta` to the session score.
    ///
    /// Returns the new high score when this delta raised it.
    pub fn apply(&mut self, delta: u32) -> Option<u32> {
        self.session_score = self.session_score.saturating_add(delta);
        if self.session_score > self.high_score {
            self.high_score = self.session_score;
            return Some(self.high_score);
        }
        None
    }

    pub fn reset_session(&mut self) {
        self.session_score = 0;
    }

    #[must_use]
    pub fn session_score(&self) -> u32 {
        self.session_score
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }
}
