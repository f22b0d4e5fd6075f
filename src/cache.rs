//! Shared cache of parsed config files
//!
//! Entries are keyed by path and validated against the file's modification
//! time and length on every lookup. Concurrent resolutions may race to fill
//! an entry; the last writer wins, which is harmless since parsing the same
//! content always yields the same result.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::RwLock;
use tracing::trace;

use crate::error::Error;
use crate::parser::{parse_file, ConfigFile, ParseMode};

struct Entry {
    modified: SystemTime,
    len: u64,
    mode: ParseMode,
    file: Arc<ConfigFile>,
}

/// Parsed config files keyed by path + modification time.
#[derive(Default)]
pub struct ParseCache {
    entries: RwLock<HashMap<PathBuf, Entry>>,
}

impl ParseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached parse of `path`, re-parsing if the file changed.
    pub fn get_or_parse(&self, path: &Path, mode: ParseMode) -> Result<Arc<ConfigFile>, Error> {
        let meta = fs::metadata(path).map_err(|e| Error::io(path, e))?;
        let len = meta.len();
        // Without a modification time there is nothing to validate against
        let Ok(modified) = meta.modified() else {
            return parse_file(path, mode).map(Arc::new);
        };

        if let Some(entry) = self.entries.read().get(path) {
            if entry.modified == modified && entry.len == len && entry.mode == mode {
                trace!(path = %path.display(), "parse cache hit");
                return Ok(Arc::clone(&entry.file));
            }
        }

        let file = Arc::new(parse_file(path, mode)?);
        self.entries.write().insert(
            path.to_path_buf(),
            Entry {
                modified,
                len,
                mode,
                file: Arc::clone(&file),
            },
        );
        Ok(file)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl std::fmt::Debug for ParseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseCache")
            .field("entries", &self.len())
            .finish()
    }
}
