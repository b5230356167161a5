//! Integer key/value stores

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Minimal persistence interface the core calls on transitions
pub trait ScoreStore {
    /// Read a value, 0 if absent or unreadable
    fn load_int(&mut self, key: &str) -> i64;
    /// Write a value; failures are logged and ignored
    fn save_int(&mut self, key: &str, value: i64);
}

/// One small text file per key in a directory (the user's home by default)
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    dir: PathBuf,
}

impl FileScoreStore {
    /// File name prefix, keeps the files grouped in the home directory
    const PREFIX: &'static str = ".brick_breaker_";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the user's home directory (current dir if unknown)
    pub fn in_home_dir() -> Self {
        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(home)
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}{}.txt", Self::PREFIX, key))
    }

    fn read(path: &Path) -> io::Result<i64> {
        let text = std::fs::read_to_string(path)?;
        text.trim()
            .parse::<i64>()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl ScoreStore for FileScoreStore {
    fn load_int(&mut self, key: &str) -> i64 {
        let path = self.path_for(key);
        match Self::read(&path) {
            Ok(v) => v.max(0),
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                0
            }
        }
    }

    fn save_int(&mut self, key: &str, value: i64) {
        let path = self.path_for(key);
        if let Err(e) = std::fs::write(&path, format!("{}\n", value)) {
            log::warn!("Could not write {}: {}", path.display(), e);
        }
    }
}

/// In-memory store; counts writes so callers can check persistence timing
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    values: HashMap<String, i64>,
    pub writes: usize,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load_int(&mut self, key: &str) -> i64 {
        self.values.get(key).copied().unwrap_or(0)
    }

    fn save_int(&mut self, key: &str, value: i64) {
        self.writes += 1;
        self.values.insert(key.to_string(), value);
    }
}
