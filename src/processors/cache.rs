use crate::error::{ProcessingError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;

/// Identity of an input file: where it is and which version of it was read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl SourceKey {
    pub fn for_path(path: &Path) -> Result<Self> {
        let missing = || ProcessingError::MissingSource {
            path: path.to_path_buf(),
        };

        let canonical = path.canonicalize().map_err(|_| missing())?;
        let metadata = std::fs::metadata(&canonical).map_err(|_| missing())?;
        if !metadata.is_file() {
            return Err(missing());
        }

        Ok(Self {
            path: canonical,
            // Some filesystems do not record modification times
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }
}

/// Memoizes loaded sources per file. An entry is reused only while the file's
/// modification time and length are unchanged.
pub struct LoadCache<T> {
    entries: HashMap<PathBuf, (SourceKey, Arc<T>)>,
    hits: usize,
    misses: usize,
}

impl<T> LoadCache<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get_or_load<F>(&mut self, path: &Path, loader: F) -> Result<Arc<T>>
    where
        F: FnOnce(&Path) -> Result<T>,
    {
        let key = SourceKey::for_path(path)?;

        if let Some((cached_key, value)) = self.entries.get(&key.path) {
            if *cached_key == key {
                self.hits += 1;
                debug!("Cache hit for {}", key.path.display());
                return Ok(Arc::clone(value));
            }
            debug!("Source changed, reloading {}", key.path.display());
        }

        self.misses += 1;
        let value = Arc::new(loader(path)?);
        self.entries
            .insert(key.path.clone(), (key, Arc::clone(&value)));

        Ok(value)
    }

    /// Drop the entry for `path`. Returns whether one was present.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.entries.remove(&canonical).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

impl<T> Default for LoadCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn read_len(path: &Path) -> Result<usize> {
        Ok(std::fs::read(path)?.len())
    }

    #[test]
    fn test_second_load_is_a_hit() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "abc")?;

        let mut cache = LoadCache::new();
        let first = cache.get_or_load(file.path(), read_len)?;
        let second = cache.get_or_load(file.path(), |_| panic!("should not reload"))?;

        assert_eq!(*first, 3);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
        Ok(())
    }

    #[test]
    fn test_modified_source_is_reloaded() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "abc")?;

        let mut cache = LoadCache::new();
        assert_eq!(*cache.get_or_load(file.path(), read_len)?, 3);

        write!(file, "defg")?;
        assert_eq!(*cache.get_or_load(file.path(), read_len)?, 7);
        assert_eq!(cache.misses(), 2);
        assert_eq!(cache.len(), 1);
        Ok(())
    }

    #[test]
    fn test_different_sources_do_not_share_entries() -> Result<()> {
        let mut a = NamedTempFile::new()?;
        let mut b = NamedTempFile::new()?;
        write!(a, "a")?;
        write!(b, "bb")?;

        let mut cache = LoadCache::new();
        assert_eq!(*cache.get_or_load(a.path(), read_len)?, 1);
        assert_eq!(*cache.get_or_load(b.path(), read_len)?, 2);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.hits(), 0);
        Ok(())
    }

    #[test]
    fn test_invalidate_forces_reload() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "abc")?;

        let mut cache = LoadCache::new();
        cache.get_or_load(file.path(), read_len)?;
        assert!(cache.invalidate(file.path()));
        assert!(!cache.invalidate(file.path()));

        cache.get_or_load(file.path(), read_len)?;
        assert_eq!(cache.misses(), 2);

        cache.clear();
        assert!(cache.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_path_is_missing_source() {
        let mut cache: LoadCache<usize> = LoadCache::new();
        let err = cache
            .get_or_load(Path::new("no/such/file.csv"), read_len)
            .unwrap_err();
        assert!(matches!(err, ProcessingError::MissingSource { .. }));
    }
}
