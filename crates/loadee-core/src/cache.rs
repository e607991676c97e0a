// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Content cache keyed by modification time
//!
//! A file is read from disk only when it was never read before or its
//! modification time moved past the stored one. Two writes within the same
//! timestamp tick cannot be told apart; the second is not observed.

use crate::error::LoaderError;
use dashmap::DashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

/// Cached file content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Raw text of the file
    pub content: Arc<str>,
    /// Modification time observed before the content was read
    pub modified: SystemTime,
}

/// Counters describing cache traffic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Reads served from memory
    pub hits: u64,
    /// Reads that went to disk
    pub reads: u64,
}

/// Thread-safe content cache
#[derive(Debug, Default)]
pub struct ContentCache {
    /// Entries by canonical path
    entries: DashMap<PathBuf, CacheEntry>,
    hits: AtomicU64,
    reads: AtomicU64,
}

impl ContentCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a file, serving unchanged content from memory
    pub async fn read(&self, path: &Path) -> Result<Arc<str>, LoaderError> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| LoaderError::file_system(path, &e))?;
        let modified = modified_time(path, metadata.modified())?;

        if let Some(content) = self.fresh(path, modified) {
            return Ok(content);
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| LoaderError::file_system(path, &e))?;
        Ok(self.store(path, content, modified))
    }

    /// Blocking variant of [`ContentCache::read`]
    pub fn read_sync(&self, path: &Path) -> Result<Arc<str>, LoaderError> {
        let metadata = std::fs::metadata(path).map_err(|e| LoaderError::file_system(path, &e))?;
        let modified = modified_time(path, metadata.modified())?;

        if let Some(content) = self.fresh(path, modified) {
            return Ok(content);
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| LoaderError::file_system(path, &e))?;
        Ok(self.store(path, content, modified))
    }

    /// Get the entry for a canonical path
    pub fn get(&self, path: &Path) -> Option<CacheEntry> {
        self.entries.get(path).map(|entry| entry.clone())
    }

    /// Check if a path is cached
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Get all cached paths
    pub fn keys(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Get the number of cached files
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the hit and read counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            reads: self.reads.load(Ordering::Relaxed),
        }
    }

    fn fresh(&self, path: &Path, modified: SystemTime) -> Option<Arc<str>> {
        let entry = self.entries.get(path)?;
        if entry.modified < modified {
            tracing::debug!("cache stale for {}", path.display());
            return None;
        }

        self.hits.fetch_add(1, Ordering::Relaxed);
        tracing::trace!("cache hit for {}", path.display());
        Some(Arc::clone(&entry.content))
    }

    fn store(&self, path: &Path, content: String, modified: SystemTime) -> Arc<str> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("read {} ({} bytes)", path.display(), content.len());

        let content: Arc<str> = Arc::from(content);
        self.entries.insert(
            path.to_path_buf(),
            CacheEntry {
                content: Arc::clone(&content),
                modified,
            },
        );
        content
    }
}

fn modified_time(path: &Path, modified: io::Result<SystemTime>) -> Result<SystemTime, LoaderError> {
    modified.map_err(|e| LoaderError::file_system(path, &e))
}
