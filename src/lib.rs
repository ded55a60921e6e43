//! Enrollment statistics for per-level school CSV files.
//!
//! The [`data`] module holds the whole pipeline (field extraction, loading,
//! region aggregation, distributions, sampling and CSV export). The
//! dashboard binary and the helper binaries only call into it.

pub mod config;
pub mod data;

pub use config::CensusConfig;
pub use data::error::{CensusError, FieldError, Result};
pub use data::model::{
    DistributionRow, FieldIssue, LevelTable, LevelTables, RawTable, RegionAggregate, RegionRow,
    SampleSet, SampledSchool, SchoolLevel, SchoolRecord,
};
