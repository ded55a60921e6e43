use std::cmp::Reverse;

use super::error::{CensusError, Result};
use super::model::{DistributionRow, RegionAggregate, SchoolLevel};

/// `part / whole`, or `0.0` when `whole` is zero.
fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Per-region relative frequencies of one core level.
///
/// The total row is not part of the output. Rows are ordered by student
/// count, then school count, both descending; remaining ties keep the
/// aggregate's region order.
pub fn build_distribution(aggregate: &RegionAggregate, level: SchoolLevel) -> Result<Vec<DistributionRow>> {
    let slot = level.core_index().ok_or(CensusError::NotAggregated(level))?;

    let total_schools: u64 = aggregate.rows.iter().map(|r| r.schools[slot]).sum();
    let total_students: u64 = aggregate.rows.iter().map(|r| r.students[slot]).sum();

    let mut out: Vec<DistributionRow> = aggregate
        .rows
        .iter()
        .map(|r| DistributionRow {
            region: r.region.clone(),
            schools: r.schools[slot],
            students: r.students[slot],
            school_ratio: ratio(r.schools[slot], total_schools),
            student_ratio: ratio(r.students[slot], total_students),
        })
        .collect();

    // sort_by_key is stable.
    out.sort_by_key(|r| (Reverse(r.students), Reverse(r.schools)));
    Ok(out)
}
