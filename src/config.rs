//! Configuration: where each level's file lives and how tables are labelled.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```json
//! { "files": { "elementary": "/srv/census/elem.csv" }, "seed": 7 }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::error::{CensusError, Result};
use crate::data::model::SchoolLevel;

/// Environment variable the dashboard reads its config path from.
pub const CONFIG_ENV: &str = "SCHOOL_CENSUS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "census.json";

/// Seed used for sampling unless configured otherwise.
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CensusConfig {
    #[serde(default)]
    pub files: DataFiles,

    /// Province name removed from region labels before grouping.
    #[serde(default = "default_region_prefix")]
    pub region_prefix: String,

    /// Label of the synthetic total row.
    #[serde(default = "default_total_label")]
    pub total_label: String,

    /// Where the `aggregate` tool persists the region table.
    #[serde(default = "default_aggregate_output")]
    pub aggregate_output: PathBuf,

    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_region_prefix() -> String {
    "충청남도".to_string()
}

fn default_total_label() -> String {
    "합계".to_string()
}

fn default_aggregate_output() -> PathBuf {
    PathBuf::from("data/aggregated_population_by_region.csv")
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

impl Default for CensusConfig {
    fn default() -> Self {
        Self {
            files: DataFiles::default(),
            region_prefix: default_region_prefix(),
            total_label: default_total_label(),
            aggregate_output: default_aggregate_output(),
            seed: default_seed(),
        }
    }
}

impl CensusConfig {
    /// Parse a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => CensusError::MissingFile {
                path: path.to_path_buf(),
            },
            _ => CensusError::io(format!("reading {}", path.display()), e),
        })?;
        serde_json::from_str(&text).map_err(|source| CensusError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like [`CensusConfig::load`], but an absent file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(e) if e.is_missing_file() => {
                log::info!("{} not found, using default configuration", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }
}

/// Explicit level → file mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataFiles {
    pub elementary: PathBuf,
    pub middle: PathBuf,
    pub high: PathBuf,
    pub special: PathBuf,
    pub various: PathBuf,
    pub other: PathBuf,
}

impl Default for DataFiles {
    fn default() -> Self {
        let published = |code: &str| {
            PathBuf::from(format!("data/2025년도_학교 현황({code})_충청남도교육청.csv"))
        };
        Self {
            elementary: published(SchoolLevel::Elementary.code()),
            middle: published(SchoolLevel::Middle.code()),
            high: published(SchoolLevel::High.code()),
            special: published(SchoolLevel::Special.code()),
            various: published(SchoolLevel::Various.code()),
            other: published(SchoolLevel::Other.code()),
        }
    }
}

impl DataFiles {
    pub fn path(&self, level: SchoolLevel) -> &Path {
        match level {
            SchoolLevel::Elementary => &self.elementary,
            SchoolLevel::Middle => &self.middle,
            SchoolLevel::High => &self.high,
            SchoolLevel::Special => &self.special,
            SchoolLevel::Various => &self.various,
            SchoolLevel::Other => &self.other,
        }
    }

    /// All paths rooted at `dir`, keeping the published file names.
    pub fn in_dir(dir: &Path) -> Self {
        let defaults = Self::default();
        let rebase = |p: &Path| match p.file_name() {
            Some(name) => dir.join(name),
            None => dir.to_path_buf(),
        };
        Self {
            elementary: rebase(&defaults.elementary),
            middle: rebase(&defaults.middle),
            high: rebase(&defaults.high),
            special: rebase(&defaults.special),
            various: rebase(&defaults.various),
            other: rebase(&defaults.other),
        }
    }
}
