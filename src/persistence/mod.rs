//! Best-run and best-time persistence
//!
//! The simulation never touches storage directly: a [`RecordStore`]
//! collaborator is injected into the session, so tests run against an
//! in-memory store and real builds write JSON files. Every write replaces
//! the whole file, so a crash mid-write never corrupts an existing record.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::besttimes::BestTimes;
use crate::replay::Trajectory;

/// Errors from the storage backend. Callers treat these as non-fatal: a
/// run proceeds with "no ghost / no recorded best" semantics.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored record is malformed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Storage collaborator for best runs and best times
pub trait RecordStore {
    fn load_best_times(&self) -> Result<BestTimes, StoreError>;
    fn save_best_times(&mut self, times: &BestTimes) -> Result<(), StoreError>;
    /// Best recorded trajectory for a level, or None if no record yet.
    fn load_best_run(&self, level: u32) -> Result<Option<Trajectory>, StoreError>;
    fn save_best_run(&mut self, level: u32, run: &Trajectory) -> Result<(), StoreError>;
}

/// JSON files under a base directory, one file per record
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn times_path(&self) -> PathBuf {
        self.dir.join("best_times.json")
    }

    fn run_path(&self, level: u32) -> PathBuf {
        self.dir.join(format!("best_run_level{level:02}.json"))
    }
}

impl RecordStore for JsonFileStore {
    fn load_best_times(&self) -> Result<BestTimes, StoreError> {
        let path = self.times_path();
        if !path.exists() {
            return Ok(BestTimes::new());
        }
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn save_best_times(&mut self, times: &BestTimes) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string(times)?;
        fs::write(self.times_path(), json)?;
        log::info!("best times saved");
        Ok(())
    }

    fn load_best_run(&self, level: u32) -> Result<Option<Trajectory>, StoreError> {
        let path = self.run_path(level);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn save_best_run(&mut self, level: u32, run: &Trajectory) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string(run)?;
        fs::write(self.run_path(level), json)?;
        log::info!("best run saved for level {level}");
        Ok(())
    }
}

/// In-memory store, used by tests and headless tooling
#[derive(Debug, Default)]
pub struct MemoryStore {
    times: BestTimes,
    runs: HashMap<u32, Trajectory>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn load_best_times(&self) -> Result<BestTimes, StoreError> {
        Ok(self.times.clone())
    }

    fn save_best_times(&mut self, times: &BestTimes) -> Result<(), StoreError> {
        self.times = times.clone();
        Ok(())
    }

    fn load_best_run(&self, level: u32) -> Result<Option<Trajectory>, StoreError> {
        Ok(self.runs.get(&level).cloned())
    }

    fn save_best_run(&mut self, level: u32, run: &Trajectory) -> Result<(), StoreError> {
        self.runs.insert(level, run.clone());
        Ok(())
    }
}
