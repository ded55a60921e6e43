//! CSV downloads. Every export starts with a UTF-8 BOM so spreadsheet tools
//! pick the right encoding for the Korean headers.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::error::{CensusError, Result};
use super::model::{DistributionRow, RegionAggregate, SampleSet, SchoolLevel};

const BOM: &[u8] = "\u{feff}".as_bytes();

pub const DISTRIBUTION_HEADERS: [&str; 5] = ["지역", "학교수", "학생수", "학교수_비율", "학생수_비율"];
pub const SAMPLE_HEADERS: [&str; 6] = ["학교급", "학교명", "설립구분", "학생수", "특수학생수", "학급당학생수"];

/// `지역`, then school counts per core level, then student counts.
pub fn aggregate_headers() -> Vec<String> {
    let mut headers = vec!["지역".to_string()];
    headers.extend(SchoolLevel::CORE.iter().map(|l| format!("{}_학교수", l.column_prefix())));
    headers.extend(SchoolLevel::CORE.iter().map(|l| format!("{}_학생수", l.column_prefix())));
    headers
}

#[derive(Serialize)]
struct DistributionCsvRow<'a> {
    region: &'a str,
    schools: u64,
    students: u64,
    school_ratio: f64,
    student_ratio: f64,
}

#[derive(Serialize)]
struct SampleCsvRow<'a> {
    level: &'a str,
    name: &'a str,
    establishment: &'a str,
    students: u32,
    special_needs: u32,
    students_per_class: Option<f64>,
}

fn writer<W, I, T>(mut out: W, headers: I) -> Result<csv::Writer<W>>
where
    W: Write,
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    out.write_all(BOM)
        .map_err(|e| CensusError::io("writing byte order mark", e))?;
    let mut w = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    w.write_record(headers).map_err(CensusError::Export)?;
    Ok(w)
}

fn finish<W: Write>(mut w: csv::Writer<W>) -> Result<()> {
    w.flush().map_err(|e| CensusError::io("flushing CSV export", e))
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Region rows followed by the total row.
pub fn write_aggregate<W: Write>(out: W, aggregate: &RegionAggregate) -> Result<()> {
    let mut w = writer(out, aggregate_headers())?;
    for row in aggregate.iter_with_total() {
        let mut record = vec![row.region.clone()];
        record.extend(row.schools.iter().map(u64::to_string));
        record.extend(row.students.iter().map(u64::to_string));
        w.write_record(&record).map_err(CensusError::Export)?;
    }
    finish(w)
}

/// Ratios are written as raw `0..=1` floats.
pub fn write_distribution<W: Write>(out: W, rows: &[DistributionRow]) -> Result<()> {
    let mut w = writer(out, DISTRIBUTION_HEADERS)?;
    for r in rows {
        w.serialize(DistributionCsvRow {
            region: &r.region,
            schools: r.schools,
            students: r.students,
            school_ratio: r.school_ratio,
            student_ratio: r.student_ratio,
        })
        .map_err(CensusError::Export)?;
    }
    finish(w)
}

pub fn write_sample<W: Write>(out: W, sample: &SampleSet) -> Result<()> {
    let mut w = writer(out, SAMPLE_HEADERS)?;
    for s in &sample.schools {
        w.serialize(SampleCsvRow {
            level: s.level.code(),
            name: &s.record.name,
            establishment: &s.record.establishment,
            students: s.record.student_count,
            special_needs: s.record.special_needs_count,
            students_per_class: s.record.students_per_class,
        })
        .map_err(CensusError::Export)?;
    }
    finish(w)
}

// -- in-memory forms for download buttons --

pub fn aggregate_bytes(aggregate: &RegionAggregate) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_aggregate(&mut buf, aggregate)?;
    Ok(buf)
}

pub fn distribution_bytes(rows: &[DistributionRow]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_distribution(&mut buf, rows)?;
    Ok(buf)
}

pub fn sample_bytes(sample: &SampleSet) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_sample(&mut buf, sample)?;
    Ok(buf)
}

/// Write `bytes` to `path`, creating parent directories.
pub fn save(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| CensusError::io(format!("creating {}", parent.display()), e))?;
    }
    fs::write(path, bytes).map_err(|e| CensusError::io(format!("writing {}", path.display()), e))?;
    log::info!("Saved {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Persist the aggregate table as the summary artifact.
pub fn save_aggregate(path: &Path, aggregate: &RegionAggregate) -> Result<()> {
    save(path, &aggregate_bytes(aggregate)?)
}
