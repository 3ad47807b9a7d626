//! Batch conversion.
//!
//! Recursively scans a directory for component sources and converts them in
//! parallel. Each file gets its own conversion context, so results never
//! depend on scheduling.

#[cfg(feature = "napi")]
use napi_derive::napi;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::cache::ConversionCache;
use crate::error::{ConversionError, Result};
use crate::options::ConvertOptions;
use crate::pipeline;
use crate::types::ConversionResult;

pub const SOURCE_EXTENSIONS: &[&str] = &["jsx", "tsx", "js"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
pub struct FileConversion {
    pub path: String,
    pub result: ConversionResult,
    /// Served from the cache rather than converted.
    pub cached: bool,
}

// ═══════════════════════════════════════════════════════════════════════════════
// DISCOVERY
// ═══════════════════════════════════════════════════════════════════════════════

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name == "node_modules" || name.starts_with('.')
}

fn is_component_source(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Component sources under `dir`, sorted by path.
pub fn discover_sources(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && is_component_source(e.path()))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONVERSION
// ═══════════════════════════════════════════════════════════════════════════════

pub fn convert_file(
    path: &Path,
    options: &ConvertOptions,
    cache: Option<&ConversionCache>,
) -> Result<FileConversion> {
    let path_str = path.to_string_lossy().to_string();
    let source = fs::read_to_string(path).map_err(|e| ConversionError::Io {
        path: path_str.clone(),
        source: e,
    })?;

    if let Some(result) = cache.and_then(|c| c.get(&path_str, &source, options)) {
        tracing::debug!(file = %path_str, "cache hit");
        return Ok(FileConversion {
            path: path_str,
            result,
            cached: true,
        });
    }

    let result = pipeline::convert(&source, options);
    if let Some(cache) = cache {
        cache.set(&path_str, &source, options, &result);
    }
    Ok(FileConversion {
        path: path_str,
        result,
        cached: false,
    })
}

/// Converts every component source under `dir`. A file that cannot be read
/// yields a failed result rather than aborting the batch.
pub fn convert_directory(
    dir: &Path,
    options: &ConvertOptions,
    cache: Option<&ConversionCache>,
) -> Vec<FileConversion> {
    discover_sources(dir)
        .par_iter()
        .map(|path| {
            convert_file(path, options, cache).unwrap_or_else(|err| {
                tracing::warn!(file = %path.display(), error = %err, "conversion skipped");
                FileConversion {
                    path: path.to_string_lossy().to_string(),
                    result: ConversionResult {
                        success: false,
                        errors: vec![err.report_entry()],
                        ..Default::default()
                    },
                    cached: false,
                }
            })
        })
        .collect()
}

#[cfg(feature = "napi")]
#[napi]
pub fn convert_directory_native(
    base_dir: String,
    options_json: Option<String>,
    cache_dir: Option<String>,
) -> napi::Result<Vec<FileConversion>> {
    let options = ConvertOptions::from_json(options_json.as_deref().unwrap_or(""))
        .map_err(|e| napi::Error::from_reason(e.to_string()))?;
    let cache = cache_dir.map(ConversionCache::open);
    Ok(convert_directory(Path::new(&base_dir), &options, cache.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn rel_paths(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_discover_sources_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "b/Card.tsx", "");
        write(root, "a/App.jsx", "");
        write(root, "util.js", "");
        write(root, "types.d.ts", "");
        write(root, "styles.css", "");
        write(root, "node_modules/react/index.js", "");
        write(root, ".cache/Old.jsx", "");

        let files = discover_sources(root);
        assert_eq!(rel_paths(root, &files), vec!["a/App.jsx", "b/Card.tsx", "util.js"]);
    }

    #[test]
    fn test_convert_directory_uses_cache() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("src");
        write(&root, "Hello.jsx", "const Hello = () => <p>hi</p>;\n");
        write(&root, "Broken.jsx", "const Broken = () => <div>;\n");
        let cache = ConversionCache::open(dir.path().join("cache"));
        let options = ConvertOptions::default();

        let first = convert_directory(&root, &options, Some(&cache));
        assert_eq!(first.len(), 2);
        assert!(first[0].path.ends_with("Broken.jsx"));
        assert!(!first[0].result.success);
        assert!(first[1].result.success);
        assert!(first.iter().all(|f| !f.cached));

        let second = convert_directory(&root, &options, Some(&cache));
        assert!(second.iter().all(|f| f.cached));
        assert_eq!(second[1].result, first[1].result);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = convert_file(&dir.path().join("Nope.jsx"), &ConvertOptions::default(), None)
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to read"));
    }
}
