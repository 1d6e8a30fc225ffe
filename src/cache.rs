//! Key-value cache for expensive detections
//!
//! Keys are caller-constructed and stable across runs (`GPU1`, `GPU2`, ...).
//! Entries live in memory for the process and, when a directory is
//! configured, in one file per key under it so later invocations can skip
//! the detection entirely. There is no TTL; staleness is the caller's
//! problem, typically solved by deleting the backing directory.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::data::PlatformInfo;

pub struct ValueCache {
    dir: Option<PathBuf>,
    entries: HashMap<String, String>,
}

impl ValueCache {
    /// Cache without or with a backing directory; `None` keeps it process-local
    pub fn new(dir: Option<PathBuf>) -> Self {
        ValueCache {
            dir,
            entries: HashMap::new(),
        }
    }

    /// Cache backed by the platform cache directory
    pub fn open(platform: &PlatformInfo) -> Self {
        Self::new(Some(PathBuf::from(&platform.cache_dir).join("ferrofetch")))
    }

    pub fn get(&mut self, key: &str) -> Option<String> {
        if let Some(value) = self.entries.get(key) {
            return Some(value.clone());
        }
        let dir = self.dir.as_ref()?;
        let value = fs::read_to_string(dir.join(key)).ok()?;
        self.entries.insert(key.to_string(), value.clone());
        Some(value)
    }

    pub fn put(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        if let Some(dir) = &self.dir {
            let written = fs::create_dir_all(dir).and_then(|_| fs::write(dir.join(key), value));
            if let Err(err) = written {
                debug!("cache write for {} failed: {}", key, err);
            }
        }
    }

    /// Read-through helper: `detect` runs only on a miss
    pub fn get_or_insert_with<F>(&mut self, key: &str, detect: F) -> String
    where
        F: FnOnce() -> String,
    {
        if let Some(value) = self.get(key) {
            return value;
        }
        let value = detect();
        self.put(key, &value);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_what_put_stored() {
        let mut cache = ValueCache::new(None);
        assert_eq!(cache.get("GPU1"), None);
        cache.put("GPU1", "AMD ATI Radeon RX 580");
        assert_eq!(cache.get("GPU1").as_deref(), Some("AMD ATI Radeon RX 580"));
    }

    #[test]
    fn hit_does_not_rerun_detection() {
        let mut cache = ValueCache::new(None);
        let mut calls = 0;
        for _ in 0..3 {
            let value = cache.get_or_insert_with("GPU1", || {
                calls += 1;
                "expensive".to_string()
            });
            assert_eq!(value, "expensive");
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn entries_survive_across_cache_instances_sharing_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = ValueCache::new(Some(dir.path().to_path_buf()));
        first.put("GPU1", "cached value");

        let mut second = ValueCache::new(Some(dir.path().to_path_buf()));
        assert_eq!(second.get("GPU1").as_deref(), Some("cached value"));
        assert_eq!(second.get("GPU2"), None);
    }
}
