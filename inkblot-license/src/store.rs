//! Key-value persistence for the trial record.
//!
//! The record is deliberately tiny (two string entries), so the store
//! interface is a plain synchronous key-value map.

use crate::error::{LicenseError, LicenseResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Key holding the trial start (epoch milliseconds as a decimal string).
pub const TRIAL_START_KEY: &str = "inkblot_trial_start";

/// Key holding the unlock flag (`"true"` or absent).
pub const UNLOCKED_KEY: &str = "inkblot_unlocked";

/// Persistent string key-value storage.
pub trait TrialStore: Send + Sync {
    /// Reads a value.
    fn get(&self, key: &str) -> LicenseResult<Option<String>>;

    /// Writes a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> LicenseResult<()>;

    /// Deletes a value. Missing keys are not an error.
    fn remove(&self, key: &str) -> LicenseResult<()>;
}

fn poisoned<T>(_: T) -> LicenseError {
    LicenseError::Storage("trial store lock poisoned".to_string())
}

/// In-memory store, used by tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryTrialStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryTrialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with entries.
    #[must_use]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }
}

impl TrialStore for MemoryTrialStore {
    fn get(&self, key: &str) -> LicenseResult<Option<String>> {
        Ok(self.entries.lock().map_err(poisoned)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> LicenseResult<()> {
        self.entries
            .lock()
            .map_err(poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> LicenseResult<()> {
        self.entries.lock().map_err(poisoned)?.remove(key);
        Ok(())
    }
}

/// JSON-file store.
///
/// The whole map is rewritten on every change through a temporary file and
/// a rename, so a crash mid-write leaves the previous file intact.
#[derive(Debug)]
pub struct FileTrialStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTrialStore {
    /// File name used inside the state directory.
    pub const FILE_NAME: &'static str = "trial.json";

    /// Opens (lazily) a store backed by `path`.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Opens the store in the platform data directory (`<data_dir>/InkBlot/trial.json`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform has no data directory.
    pub fn open_default() -> LicenseResult<Self> {
        let dir = dirs::data_dir()
            .ok_or_else(|| LicenseError::Storage("no platform data directory".to_string()))?;
        Ok(Self::open(dir.join("InkBlot").join(Self::FILE_NAME)))
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> LicenseResult<BTreeMap<String, String>> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> LicenseResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(map)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Wrote trial store {}", self.path.display());
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> LicenseResult<()> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        let mut map = self.read_map()?;
        f(&mut map);
        self.write_map(&map)
    }
}

impl TrialStore for FileTrialStore {
    fn get(&self, key: &str) -> LicenseResult<Option<String>> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> LicenseResult<()> {
        self.update(|map| {
            map.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> LicenseResult<()> {
        self.update(|map| {
            map.remove(key);
        })
    }
}
