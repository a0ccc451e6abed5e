use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use tracing::{debug, warn};

use crate::parser::{self, ModuleExportMap, ParseError};

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to stat {path}: {source}")]
    Metadata { path: PathBuf, source: io::Error },
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Exports of one module as of a given modification time.
#[derive(Debug, Clone)]
pub struct CacheRecord {
    pub modified: SystemTime,
    pub exports: ModuleExportMap,
}

/// Parsed exports keyed by absolute module path.
///
/// A record is reused only while the file's modification time matches the one
/// it was parsed at. Records are never evicted; they live as long as the cache.
#[derive(Debug, Default)]
pub struct ModuleCache {
    records: HashMap<PathBuf, CacheRecord>,
    parses: usize,
    empty: ModuleExportMap,
}

impl ModuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the exports of the module at `path`, parsing it when there is
    /// no record or the record is stale.
    ///
    /// A missing file is logged and yields an empty map. Other I/O and parse
    /// failures are returned and nothing is cached for the path.
    pub fn exports(&mut self, path: &Path) -> Result<&ModuleExportMap, CacheError> {
        let modified = match modified_time(path) {
            Ok(modified) => modified,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(self.missing(path)),
            Err(source) => return Err(CacheError::Metadata { path: path.to_path_buf(), source }),
        };

        let fresh = self.records.get(path).is_some_and(|r| r.modified == modified);
        if fresh {
            debug!(path = %path.display(), "module cache hit");
        } else {
            let source = match std::fs::read_to_string(path) {
                Ok(source) => source,
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(self.missing(path)),
                Err(source) => return Err(CacheError::Read { path: path.to_path_buf(), source }),
            };

            self.parses += 1;
            debug!(path = %path.display(), parses = self.parses, "parsing module");
            let exports = parser::parse_module_exports(&source, &parser::module_display_name(path))?;
            self.records.insert(path.to_path_buf(), CacheRecord { modified, exports });
        }

        Ok(&self.records[path].exports)
    }

    fn missing(&self, path: &Path) -> &ModuleExportMap {
        warn!(path = %path.display(), "File not found");
        &self.empty
    }

    pub fn get(&self, path: &Path) -> Option<&CacheRecord> {
        self.records.get(path)
    }

    /// Number of parses performed since the cache was created.
    pub fn parse_count(&self) -> usize {
        self.parses
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn modified_time(path: &Path) -> io::Result<SystemTime> {
    std::fs::metadata(path)?.modified()
}
