use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::config::CensusConfig;

use super::error::{CensusError, Result};
use super::loader::load_level;
use super::model::{LevelTable, LevelTables, SchoolLevel};

// ---------------------------------------------------------------------------
// Memoised level loads
// ---------------------------------------------------------------------------

struct Entry {
    modified: SystemTime,
    table: LevelTable,
}

/// Loaded tables keyed by path and level, valid while the file's
/// modification time is unchanged. A hit is identical to a fresh load.
#[derive(Default)]
pub struct TableCache {
    entries: HashMap<(PathBuf, SchoolLevel), Entry>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table, reloading when the file changed or vanished.
    pub fn load(&mut self, path: &Path, level: SchoolLevel) -> Result<LevelTable> {
        let key = (path.to_path_buf(), level);
        let modified = match modified_time(path) {
            Ok(t) => t,
            Err(e) => {
                self.entries.remove(&key);
                return Err(e);
            }
        };

        if let Some(entry) = self.entries.get(&key) {
            if entry.modified == modified {
                log::debug!("Cache hit for {}", path.display());
                return Ok(entry.table.clone());
            }
        }

        let table = load_level(path, level)?;
        self.entries.insert(
            key,
            Entry {
                modified,
                table: table.clone(),
            },
        );
        Ok(table)
    }

    /// Cached counterpart of [`super::loader::load_levels`].
    pub fn load_levels(
        &mut self,
        config: &CensusConfig,
        levels: &[SchoolLevel],
    ) -> (LevelTables, Vec<CensusError>) {
        let mut tables = LevelTables::new();
        let mut errors = Vec::new();
        for &level in levels {
            match self.load(config.files.path(level), level) {
                Ok(table) => {
                    tables.insert(level, table);
                }
                Err(e) => errors.push(e),
            }
        }
        (tables, errors)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn modified_time(path: &Path) -> Result<SystemTime> {
    let meta = fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CensusError::MissingFile {
            path: path.to_path_buf(),
        },
        _ => CensusError::io(format!("reading metadata of {}", path.display()), e),
    })?;
    meta.modified()
        .map_err(|e| CensusError::io(format!("reading mtime of {}", path.display()), e))
}
