use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use crate::options::ConvertOptions;
use crate::types::ConversionResult;

pub const DEFAULT_CACHE_DIR: &str = ".horizon/cache";

#[derive(Serialize, Deserialize)]
pub struct CacheEntry {
    pub hash: String,
    pub result: ConversionResult,
}

/// Conversion results keyed by file path. An entry is only served while the
/// source text and the options it was produced with are unchanged.
pub struct ConversionCache {
    cache_dir: PathBuf,
}

impl ConversionCache {
    pub fn new() -> Self {
        Self::open(DEFAULT_CACHE_DIR)
    }

    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let cache_dir = dir.into();
        if !cache_dir.exists() {
            if let Err(e) = fs::create_dir_all(&cache_dir) {
                tracing::warn!(dir = %cache_dir.display(), error = %e, "cannot create cache directory");
            }
        }
        Self { cache_dir }
    }

    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn compute_hash(source: &str, options: &ConvertOptions) -> String {
        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        hasher.update([0u8]);
        hasher.update(options.fingerprint().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn entry_path(&self, file_path: &str) -> PathBuf {
        let safe_name = file_path
            .replace('/', "_")
            .replace('\\', "_")
            .replace(':', "_");
        self.cache_dir.join(format!("{}.json", safe_name))
    }

    pub fn get(&self, file_path: &str, source: &str, options: &ConvertOptions) -> Option<ConversionResult> {
        let entry_path = self.entry_path(file_path);
        let data = fs::read_to_string(&entry_path).ok()?;

        let entry: CacheEntry = match serde_json::from_str(&data) {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(file = %file_path, error = %e, "discarding corrupt cache entry");
                fs::remove_file(&entry_path).ok();
                return None;
            }
        };

        (entry.hash == Self::compute_hash(source, options)).then(|| entry.result)
    }

    pub fn set(&self, file_path: &str, source: &str, options: &ConvertOptions, result: &ConversionResult) {
        let entry = CacheEntry {
            hash: Self::compute_hash(source, options),
            result: result.clone(),
        };
        match serde_json::to_string(&entry) {
            Ok(data) => {
                if let Err(e) = fs::write(self.entry_path(file_path), data) {
                    tracing::warn!(file = %file_path, error = %e, "cannot write cache entry");
                }
            }
            Err(e) => tracing::warn!(file = %file_path, error = %e, "cannot serialize cache entry"),
        }
    }
}

impl Default for ConversionCache {
    fn default() -> Self {
        Self::new()
    }
}
