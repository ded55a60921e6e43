use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use super::error::{CensusError, Result};
use super::model::{LevelTable, LevelTables, SchoolLevel, SchoolRecord};

// ---------------------------------------------------------------------------
// Sampling criteria: which schools are eligible, and how many to draw
// ---------------------------------------------------------------------------

pub const MIN_STUDENTS_RANGE: RangeInclusive<u32> = 0..=500;
pub const SAMPLE_PERCENT_RANGE: RangeInclusive<u8> = 5..=30;

/// Validated sampler inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleCriteria {
    min_students: u32,
    require_special_needs: bool,
    sample_percent: u8,
}

impl Default for SampleCriteria {
    fn default() -> Self {
        Self {
            min_students: 100,
            require_special_needs: false,
            sample_percent: 10,
        }
    }
}

impl SampleCriteria {
    pub fn new(min_students: u32, require_special_needs: bool, sample_percent: u8) -> Result<Self> {
        if !MIN_STUDENTS_RANGE.contains(&min_students) {
            return Err(CensusError::InvalidCriteria(format!(
                "minimum student count {min_students} outside {}..={}",
                MIN_STUDENTS_RANGE.start(),
                MIN_STUDENTS_RANGE.end()
            )));
        }
        if !SAMPLE_PERCENT_RANGE.contains(&sample_percent) {
            return Err(CensusError::InvalidCriteria(format!(
                "sample percentage {sample_percent} outside {}..={}",
                SAMPLE_PERCENT_RANGE.start(),
                SAMPLE_PERCENT_RANGE.end()
            )));
        }
        Ok(Self {
            min_students,
            require_special_needs,
            sample_percent,
        })
    }

    pub fn min_students(&self) -> u32 {
        self.min_students
    }

    pub fn require_special_needs(&self) -> bool {
        self.require_special_needs
    }

    pub fn sample_percent(&self) -> u8 {
        self.sample_percent
    }

    /// Whether one school passes the filter.
    pub fn accepts(&self, rec: &SchoolRecord) -> bool {
        rec.student_count >= self.min_students
            && (!self.require_special_needs || rec.special_needs_count > 0)
    }
}

/// Schools of `table` passing `criteria`, in table order.
pub fn eligible<'a>(table: &'a LevelTable, criteria: &SampleCriteria) -> Vec<&'a SchoolRecord> {
    table.records.iter().filter(|r| criteria.accepts(r)).collect()
}

/// Eligible school count per core level; absent levels report zero.
pub fn eligible_counts(tables: &LevelTables, criteria: &SampleCriteria) -> BTreeMap<SchoolLevel, usize> {
    SchoolLevel::CORE
        .iter()
        .map(|&level| {
            let n = tables.get(&level).map_or(0, |t| eligible(t, criteria).len());
            (level, n)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(students: u32, special: u32) -> SchoolRecord {
        SchoolRecord {
            region: "천안".to_string(),
            name: format!("s{students}-{special}"),
            establishment: "공립".to_string(),
            class_count: 1,
            student_count: students,
            special_needs_count: special,
            students_per_class: None,
        }
    }

    #[test]
    fn test_criteria_ranges() {
        assert!(SampleCriteria::new(0, false, 5).is_ok());
        assert!(SampleCriteria::new(500, true, 30).is_ok());
        assert!(matches!(
            SampleCriteria::new(501, false, 10),
            Err(CensusError::InvalidCriteria(_))
        ));
        assert!(SampleCriteria::new(100, false, 4).is_err());
        assert!(SampleCriteria::new(100, false, 31).is_err());
    }

    #[test]
    fn test_eligible_filters_by_threshold_and_special_needs() {
        let table = LevelTable::new(
            SchoolLevel::Middle,
            "mem.csv",
            vec![rec(99, 3), rec(100, 0), rec(250, 2), rec(10, 0)],
        );

        let any = SampleCriteria::new(100, false, 10).unwrap();
        let names: Vec<&str> = eligible(&table, &any).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["s100-0", "s250-2"]);

        let special = SampleCriteria::new(100, true, 10).unwrap();
        let names: Vec<&str> = eligible(&table, &special).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["s250-2"]);

        let everyone = SampleCriteria::new(0, false, 10).unwrap();
        assert_eq!(eligible(&table, &everyone).len(), 4);
    }

    #[test]
    fn test_eligible_counts_cover_core_levels() {
        let mut tables = LevelTables::new();
        tables.insert(
            SchoolLevel::High,
            LevelTable::new(SchoolLevel::High, "mem.csv", vec![rec(300, 0), rec(5, 0)]),
        );
        let counts = eligible_counts(&tables, &SampleCriteria::default());
        assert_eq!(counts.len(), 3);
        assert_eq!(counts[&SchoolLevel::Elementary], 0);
        assert_eq!(counts[&SchoolLevel::High], 1);
    }
}
