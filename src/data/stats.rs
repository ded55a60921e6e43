//! Descriptive statistics for the exploration and summary pages.

use std::collections::BTreeMap;

use super::model::LevelTable;

/// Headline numbers of one level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSummary {
    pub total_schools: usize,
    /// Schools with at least one special-needs student.
    pub special_needs_schools: usize,
    /// `None` for an empty table.
    pub mean_students: Option<f64>,
}

pub fn summarize(table: &LevelTable) -> LevelSummary {
    let total_schools = table.len();
    let special_needs_schools = table
        .records
        .iter()
        .filter(|r| r.special_needs_count > 0)
        .count();
    let mean_students = (total_schools > 0).then(|| {
        let sum: u64 = table.records.iter().map(|r| u64::from(r.student_count)).sum();
        sum as f64 / total_schools as f64
    });
    LevelSummary {
        total_schools,
        special_needs_schools,
        mean_students,
    }
}

/// One bar of a histogram: `[start, end)`, the last bar closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width histogram over the finite values.
///
/// Constant input gives a single bin of width 1; no finite values gives no
/// bins.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if (max - min).abs() < f64::EPSILON {
        return vec![HistogramBin {
            start: min,
            end: min + 1.0,
            count: finite.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in finite {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

/// School count per raw region label, most schools first (ties by label).
pub fn schools_per_region(table: &LevelTable) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for rec in &table.records {
        *counts.entry(rec.region.as_str()).or_default() += 1;
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(region, n)| (region.to_string(), n))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{SchoolLevel, SchoolRecord};

    fn table(rows: &[(&str, u32, u32)]) -> LevelTable {
        let records = rows
            .iter()
            .map(|&(region, students, special)| SchoolRecord {
                region: region.to_string(),
                name: String::new(),
                establishment: String::new(),
                class_count: 0,
                student_count: students,
                special_needs_count: special,
                students_per_class: None,
            })
            .collect();
        LevelTable::new(SchoolLevel::Elementary, "mem.csv", records)
    }

    #[test]
    fn test_summarize() {
        let s = summarize(&table(&[("a", 100, 2), ("b", 51, 0), ("a", 0, 0)]));
        assert_eq!(s.total_schools, 3);
        assert_eq!(s.special_needs_schools, 1);
        assert!((s.mean_students.unwrap() - 50.333_333).abs() < 1e-3);

        let empty = summarize(&table(&[]));
        assert_eq!(empty.total_schools, 0);
        assert_eq!(empty.mean_students, None);
    }

    #[test]
    fn test_histogram() {
        let bins = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0, f64::NAN], 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|b| b.count).collect::<Vec<_>>(), vec![1, 1, 1, 2]);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[3].end, 4.0);
        assert_eq!(bins[1].width(), 1.0);
        assert_eq!(bins[1].center(), 1.5);
    }

    #[test]
    fn test_histogram_degenerate_inputs() {
        assert!(histogram(&[], 10).is_empty());
        assert!(histogram(&[f64::NAN], 10).is_empty());
        assert!(histogram(&[1.0], 0).is_empty());

        let constant = histogram(&[7.0, 7.0, 7.0], 40);
        assert_eq!(constant.len(), 1);
        assert_eq!(constant[0].count, 3);
        assert_eq!((constant[0].start, constant[0].end), (7.0, 8.0));
    }

    #[test]
    fn test_schools_per_region() {
        let t = table(&[("천안", 1, 0), ("아산", 1, 0), ("천안", 1, 0), ("공주", 1, 0)]);
        assert_eq!(
            schools_per_region(&t),
            vec![
                ("천안".to_string(), 2),
                ("공주".to_string(), 1),
                ("아산".to_string(), 1),
            ]
        );
    }
}
