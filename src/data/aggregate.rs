use std::collections::BTreeMap;

use super::fields::strip_region_prefix;
use super::model::{LevelTable, LevelTables, RegionAggregate, RegionRow, SchoolLevel};

// ---------------------------------------------------------------------------
// Region aggregation across the core levels
// ---------------------------------------------------------------------------

/// Schools and students per region, after stripping `region_prefix`.
fn group_by_region(table: &LevelTable, region_prefix: &str) -> BTreeMap<String, (u64, u64)> {
    let mut groups: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for rec in &table.records {
        let entry = groups
            .entry(strip_region_prefix(&rec.region, region_prefix))
            .or_default();
        entry.0 += 1;
        entry.1 += u64::from(rec.student_count);
    }
    groups
}

/// Build the region × level table.
///
/// Regions are the union over the core levels (a full outer join): a region
/// missing from one level gets zeros for that level. Levels absent from
/// `tables` count as empty; non-core levels are ignored. Rows are sorted by
/// region name and followed by a `total_label` row holding column sums.
pub fn aggregate(tables: &LevelTables, region_prefix: &str, total_label: &str) -> RegionAggregate {
    let mut merged: BTreeMap<String, RegionRow> = BTreeMap::new();

    for (slot, level) in SchoolLevel::CORE.iter().enumerate() {
        let Some(table) = tables.get(level) else {
            continue;
        };
        for (region, (schools, students)) in group_by_region(table, region_prefix) {
            let row = merged
                .entry(region)
                .or_insert_with_key(|region| RegionRow::new(region.clone()));
            row.schools[slot] = schools;
            row.students[slot] = students;
        }
    }

    let rows: Vec<RegionRow> = merged.into_values().collect();

    let mut total = RegionRow::new(total_label);
    for row in &rows {
        for slot in 0..SchoolLevel::CORE.len() {
            total.schools[slot] += row.schools[slot];
            total.students[slot] += row.students[slot];
        }
    }

    log::debug!("Aggregated {} regions", rows.len());
    RegionAggregate { rows, total }
}
