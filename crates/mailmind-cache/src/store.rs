//! Whole-document JSON persistence for one cache instance

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CacheError;

/// In-memory view of a cache document: prompt (or message id) to value.
pub type CacheMap<V> = BTreeMap<String, V>;

/// Size information for a cache document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreStats {
    pub total_entries: usize,
    pub total_size_bytes: u64,
}

/// A cache persisted as a single JSON object at `path`.
///
/// The document is always read and written as a whole: `save` replaces the
/// file with exactly the mapping it is given, so callers must `load`, mutate
/// and then `save`. There is no eviction and no size bound.
pub struct ResponseStore<V> {
    path: PathBuf,
    _value: PhantomData<fn() -> V>,
}

impl<V> ResponseStore<V>
where
    V: Serialize + DeserializeOwned,
{
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            _value: PhantomData,
        }
    }

    /// Get the document path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full mapping
    ///
    /// A missing document is an empty cache. A document that does not parse
    /// is reported as [`CacheError::Corrupt`] and left untouched on disk.
    pub fn load(&self) -> Result<CacheMap<V>, CacheError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(CacheMap::new()),
            Err(e) => return Err(CacheError::io(&self.path, e)),
        };

        serde_json::from_str(&content).map_err(|source| CacheError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the stored document with `mapping`
    pub fn save(&self, mapping: &CacheMap<V>) -> Result<(), CacheError> {
        let content = serde_json::to_string_pretty(mapping).map_err(CacheError::Serialize)?;
        write_atomic(&self.path, content.as_bytes())?;
        log::debug!(
            "Cache document saved: {} ({} entries)",
            self.path.display(),
            mapping.len()
        );
        Ok(())
    }

    /// Delete the document, returning how many entries it held.
    ///
    /// A corrupt document is removed as well and counts as zero entries.
    pub fn clear(&self) -> Result<usize, CacheError> {
        let removed = match self.load() {
            Ok(mapping) => mapping.len(),
            Err(CacheError::Corrupt { .. }) => 0,
            Err(e) => return Err(e),
        };
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(CacheError::io(&self.path, e)),
        }
        log::debug!("Cache document removed: {}", self.path.display());
        Ok(removed)
    }

    pub fn stats(&self) -> Result<StoreStats, CacheError> {
        let total_size_bytes = match fs::metadata(&self.path) {
            Ok(metadata) => metadata.len(),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoreStats::default()),
            Err(e) => return Err(CacheError::io(&self.path, e)),
        };

        Ok(StoreStats {
            total_entries: self.load()?.len(),
            total_size_bytes,
        })
    }
}

/// Write `bytes` to `path` through a temp file in the same directory.
///
/// Creates the parent directory if it is missing. Readers see either the
/// previous document or the new one, never a partial write.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CacheError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    fs::create_dir_all(dir).map_err(|e| CacheError::io(dir, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| CacheError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| CacheError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| CacheError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| CacheError::io(path, e.error))?;

    Ok(())
}
