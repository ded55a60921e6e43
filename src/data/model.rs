use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use super::error::FieldError;

// ---------------------------------------------------------------------------
// SchoolLevel – which published file a table came from
// ---------------------------------------------------------------------------

/// The six school levels published by the provincial office of education.
///
/// Only [`SchoolLevel::CORE`] levels take part in aggregation, distributions
/// and sampling; the rest are preview-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchoolLevel {
    Elementary,
    Middle,
    High,
    Special,
    Various,
    Other,
}

impl SchoolLevel {
    pub const ALL: [SchoolLevel; 6] = [
        SchoolLevel::Elementary,
        SchoolLevel::Middle,
        SchoolLevel::High,
        SchoolLevel::Special,
        SchoolLevel::Various,
        SchoolLevel::Other,
    ];

    pub const CORE: [SchoolLevel; 3] = [
        SchoolLevel::Elementary,
        SchoolLevel::Middle,
        SchoolLevel::High,
    ];

    /// Short tag embedded in the source file names, e.g. `초` in `(초)`.
    pub fn code(self) -> &'static str {
        match self {
            SchoolLevel::Elementary => "초",
            SchoolLevel::Middle => "중",
            SchoolLevel::High => "고",
            SchoolLevel::Special => "특",
            SchoolLevel::Various => "각",
            SchoolLevel::Other => "그",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            SchoolLevel::Elementary => "초등학교",
            SchoolLevel::Middle => "중학교",
            SchoolLevel::High => "고등학교",
            SchoolLevel::Special => "특수학교",
            SchoolLevel::Various => "각종학교",
            SchoolLevel::Other => "기타학교",
        }
    }

    /// Column prefix used in the aggregate table (`초등_학교수`, ...).
    pub fn column_prefix(self) -> &'static str {
        match self {
            SchoolLevel::Elementary => "초등",
            other => other.code(),
        }
    }

    /// Position of the level's counters in a [`RegionRow`].
    pub fn core_index(self) -> Option<usize> {
        SchoolLevel::CORE.iter().position(|&l| l == self)
    }

    pub fn is_core(self) -> bool {
        self.core_index().is_some()
    }
}

impl fmt::Display for SchoolLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// SchoolRecord / LevelTable – normalised rows of one level file
// ---------------------------------------------------------------------------

/// One school after the combined fields have been split.
#[derive(Debug, Clone, PartialEq)]
pub struct SchoolRecord {
    pub region: String,
    pub name: String,
    pub establishment: String,
    pub class_count: u32,
    pub student_count: u32,
    /// Always `<= student_count`.
    pub special_needs_count: u32,
    /// As published; `None` when the cell is blank or unreadable.
    pub students_per_class: Option<f64>,
}

/// A combined field that failed to parse and was zero-filled.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    /// 1-based data row (the header is row 0).
    pub row: usize,
    pub column: String,
    pub raw: String,
    pub error: FieldError,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {} column '{}': {}", self.row, self.column, self.error)
    }
}

/// All schools of one level, as loaded from one file.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelTable {
    pub level: SchoolLevel,
    pub source: PathBuf,
    pub records: Vec<SchoolRecord>,
    /// Rows whose counts were zero-filled, so a parse failure can be told
    /// apart from a genuine zero.
    pub issues: Vec<FieldIssue>,
}

impl LevelTable {
    pub fn new(level: SchoolLevel, source: impl Into<PathBuf>, records: Vec<SchoolRecord>) -> Self {
        Self {
            level,
            source: source.into(),
            records,
            issues: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Tables keyed by level; absent levels count as empty.
pub type LevelTables = BTreeMap<SchoolLevel, LevelTable>;

/// A file read verbatim, for previews.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// RegionAggregate – schools and students per region and core level
// ---------------------------------------------------------------------------

/// Counters of one region, indexed by [`SchoolLevel::core_index`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionRow {
    pub region: String,
    pub schools: [u64; 3],
    pub students: [u64; 3],
}

impl RegionRow {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Default::default()
        }
    }

    pub fn schools_of(&self, level: SchoolLevel) -> Option<u64> {
        level.core_index().map(|i| self.schools[i])
    }

    pub fn students_of(&self, level: SchoolLevel) -> Option<u64> {
        level.core_index().map(|i| self.students[i])
    }
}

/// Regions in ascending order plus the synthetic total row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionAggregate {
    pub rows: Vec<RegionRow>,
    /// Column-wise sum of `rows`, labelled with the configured total label.
    pub total: RegionRow,
}

impl RegionAggregate {
    /// Region rows followed by the total row, in export order.
    pub fn iter_with_total(&self) -> impl Iterator<Item = &RegionRow> {
        self.rows.iter().chain(std::iter::once(&self.total))
    }
}

/// One region of a per-level distribution table.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionRow {
    pub region: String,
    pub schools: u64,
    pub students: u64,
    /// In `0.0..=1.0`.
    pub school_ratio: f64,
    /// In `0.0..=1.0`.
    pub student_ratio: f64,
}

// ---------------------------------------------------------------------------
// SampleSet – drawn schools with their level tag
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SampledSchool {
    pub level: SchoolLevel,
    pub record: SchoolRecord,
}

/// Sampled schools, grouped by level in [`SchoolLevel::CORE`] order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSet {
    pub schools: Vec<SampledSchool>,
}

impl SampleSet {
    pub fn len(&self) -> usize {
        self.schools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schools.is_empty()
    }

    pub fn count_of(&self, level: SchoolLevel) -> usize {
        self.schools.iter().filter(|s| s.level == level).count()
    }
}
