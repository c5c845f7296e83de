//! Pure memoization of ingestion passes.
//!
//! Keyed by (directory, pattern) plus a fingerprint of the matching
//! files' path, size, and modification time. A reload happens exactly
//! when the fingerprint changes; there is no hidden invalidation. This
//! is an optimization only, callers may bypass it freely.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};

use crate::loader::{load_csvs, IngestReport};

type Fingerprint = Vec<(PathBuf, u64, Option<SystemTime>)>;

#[derive(Debug, Default)]
pub struct IngestCache {
    entries: HashMap<(PathBuf, String), (Fingerprint, IngestReport)>,
}

impl IngestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Like [`load_csvs`], but returns the memoized report when the
    /// directory contents for this pattern are unchanged.
    pub fn load(&mut self, dir: &Path, pattern: &str) -> Result<IngestReport> {
        let key = (dir.to_path_buf(), pattern.to_string());
        let fingerprint = fingerprint(dir, pattern)?;

        if let Some((cached_fp, report)) = self.entries.get(&key) {
            if *cached_fp == fingerprint {
                return Ok(report.clone());
            }
        }

        let report = load_csvs(dir, pattern)?;
        self.entries.insert(key, (fingerprint, report.clone()));
        Ok(report)
    }

    /// Number of memoized (directory, pattern) entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sorted (path, size, mtime) of every file matching the pattern.
fn fingerprint(dir: &Path, pattern: &str) -> Result<Fingerprint> {
    let full = dir.join(pattern);
    let full = full.to_str().context("data directory path is not UTF-8")?;
    let mut out: Fingerprint = Vec::new();
    for entry in glob::glob(full).with_context(|| format!("bad glob pattern: {pattern}"))? {
        let Ok(path) = entry else { continue };
        let Ok(meta) = std::fs::metadata(&path) else {
            continue;
        };
        out.push((path, meta.len(), meta.modified().ok()));
    }
    out.sort();
    Ok(out)
}
