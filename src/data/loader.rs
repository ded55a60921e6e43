use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::config::CensusConfig;

use super::error::{CensusError, FieldError, Result};
use super::fields::{extract_leading_int, parse_decimal, split_count_and_special};
use super::model::{FieldIssue, LevelTable, LevelTables, RawTable, SchoolLevel, SchoolRecord};

// ---------------------------------------------------------------------------
// Column names of the published files
// ---------------------------------------------------------------------------

pub const COL_REGION: &str = "지역";
pub const COL_SCHOOL_NAME: &str = "학교명";
pub const COL_ESTABLISHMENT: &str = "설립구분";
/// `total(special)` students.
pub const COL_STUDENTS_COMBINED: &str = "학생수(계)";
/// `classes(special classes)` or plain `classes`.
pub const COL_CLASSES_COMBINED: &str = "학급수(계)";
pub const COL_STUDENTS_PER_CLASS: &str = "학급당학생수";

const BOM: char = '\u{feff}';

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load one level file and split its combined fields.
///
/// Malformed combined fields never abort the load: the affected counts are
/// zero-filled (students-per-class becomes `None`) and the failure is kept in
/// [`LevelTable::issues`]. Rows shorter than the header are kept too; each
/// missing cell is recorded as [`FieldError::MissingCell`]. A special count
/// above the total keeps the total and zero-fills the special count.
pub fn load_level(path: &Path, level: SchoolLevel) -> Result<LevelTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(open(path)?);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CensusError::csv(path, e))?
        .iter()
        .map(clean_header)
        .collect();

    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| CensusError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
    };
    let region_idx = column(COL_REGION)?;
    let name_idx = column(COL_SCHOOL_NAME)?;
    let establishment_idx = column(COL_ESTABLISHMENT)?;
    let students_idx = column(COL_STUDENTS_COMBINED)?;
    let classes_idx = column(COL_CLASSES_COMBINED)?;
    let per_class_idx = column(COL_STUDENTS_PER_CLASS)?;
    let columns = [
        (COL_REGION, region_idx),
        (COL_SCHOOL_NAME, name_idx),
        (COL_ESTABLISHMENT, establishment_idx),
        (COL_STUDENTS_COMBINED, students_idx),
        (COL_CLASSES_COMBINED, classes_idx),
        (COL_STUDENTS_PER_CLASS, per_class_idx),
    ];

    let mut records = Vec::new();
    let mut issues = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| CensusError::csv(path, e))?;
        let cell = |idx: usize| record.get(idx);

        let mut issue = |column: &str, raw: &str, error| {
            log::warn!("{}: row {row} column '{column}': {error}", path.display());
            issues.push(FieldIssue {
                row,
                column: column.to_string(),
                raw: raw.to_string(),
                error,
            });
        };

        for (name, idx) in columns {
            if cell(idx).is_none() {
                issue(name, "", FieldError::MissingCell);
            }
        }

        let (student_count, special_needs_count) = match cell(students_idx) {
            Some(raw) => split_count_and_special(raw).unwrap_or_else(|e| {
                let kept = match e {
                    FieldError::SpecialExceedsTotal { total, .. } => (total, 0),
                    _ => (0, 0),
                };
                issue(COL_STUDENTS_COMBINED, raw, e);
                kept
            }),
            None => (0, 0),
        };

        let class_count = match cell(classes_idx) {
            Some(raw) => extract_leading_int(raw).unwrap_or_else(|e| {
                issue(COL_CLASSES_COMBINED, raw, e);
                0
            }),
            None => 0,
        };

        let students_per_class = match cell(per_class_idx) {
            Some(raw) => parse_decimal(raw).unwrap_or_else(|e| {
                issue(COL_STUDENTS_PER_CLASS, raw, e);
                None
            }),
            None => None,
        };

        let text = |idx: usize| cell(idx).unwrap_or("").trim().to_string();
        records.push(SchoolRecord {
            region: text(region_idx),
            name: text(name_idx),
            establishment: text(establishment_idx),
            class_count,
            student_count,
            special_needs_count,
            students_per_class,
        });
    }

    log::info!(
        "Loaded {} {} schools from {} ({} malformed fields)",
        records.len(),
        level.label(),
        path.display(),
        issues.len()
    );

    Ok(LevelTable {
        level,
        source: path.to_path_buf(),
        records,
        issues,
    })
}

/// Read a file verbatim for previews. Rows may have differing lengths.
pub fn load_raw(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(open(path)?);
    let headers = reader
        .headers()
        .map_err(|e| CensusError::csv(path, e))?
        .iter()
        .map(clean_header)
        .collect();

    let rows = reader
        .records()
        .map(|r| {
            r.map(|rec| rec.iter().map(str::to_string).collect())
                .map_err(|e| CensusError::csv(path, e))
        })
        .collect::<Result<Vec<Vec<String>>>>()?;

    Ok(RawTable { headers, rows })
}

/// Load the given levels from the configured paths.
///
/// Levels whose file cannot be loaded are left out of the returned tables
/// (downstream stages treat them as empty); the errors are returned for the
/// caller to report.
pub fn load_levels(config: &CensusConfig, levels: &[SchoolLevel]) -> (LevelTables, Vec<CensusError>) {
    let mut tables = LevelTables::new();
    let mut errors = Vec::new();
    for &level in levels {
        match load_level(config.files.path(level), level) {
            Ok(table) => {
                tables.insert(level, table);
            }
            Err(e) => {
                log::warn!("Skipping {level}: {e}");
                errors.push(e);
            }
        }
    }
    (tables, errors)
}

// -- helpers --

fn open(path: &Path) -> Result<impl Read> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CensusError::MissingFile {
            path: path.to_path_buf(),
        },
        _ => CensusError::io(format!("opening {}", path.display()), e),
    })
}

fn clean_header(h: &str) -> String {
    h.trim_start_matches(BOM).trim().to_string()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::data::error::FieldError;

    const HEADER: &str = "지역,학교명,설립구분,학생수(계),학급수(계),학급당학생수\n";

    fn write(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_load_level_splits_combined_fields() {
        let dir = TempDir::new().unwrap();
        let body = format!(
            "{HEADER}충청남도 천안시,천안초,공립,\"1,204(13)\",42(2),28.7\n충청남도 아산시,아산초,사립,80(0),6,13.3\n"
        );
        let path = write(&dir, "elem.csv", &body);

        let table = load_level(&path, SchoolLevel::Elementary).unwrap();
        assert_eq!(table.level, SchoolLevel::Elementary);
        assert_eq!(table.len(), 2);
        assert!(table.issues.is_empty());

        let first = &table.records[0];
        assert_eq!(first.region, "충청남도 천안시");
        assert_eq!(first.name, "천안초");
        assert_eq!(first.establishment, "공립");
        assert_eq!(first.student_count, 1204);
        assert_eq!(first.special_needs_count, 13);
        assert_eq!(first.class_count, 42);
        assert_eq!(first.students_per_class, Some(28.7));
        assert_eq!(table.records[1].class_count, 6);
    }

    #[test]
    fn test_load_level_strips_bom() {
        let dir = TempDir::new().unwrap();
        let body = format!("\u{feff}{HEADER}천안,a,공립,10(1),1,10.0\n");
        let path = write(&dir, "bom.csv", &body);

        let table = load_level(&path, SchoolLevel::Middle).unwrap();
        assert_eq!(table.records[0].region, "천안");
    }

    #[test]
    fn test_malformed_fields_are_zero_filled_and_recorded() {
        let dir = TempDir::new().unwrap();
        let body = format!("{HEADER}천안,a,공립,unknown,-,\n천안,b,공립,0(0),0,0\n");
        let path = write(&dir, "bad.csv", &body);

        let table = load_level(&path, SchoolLevel::High).unwrap();
        assert_eq!(table.len(), 2);

        let bad = &table.records[0];
        assert_eq!((bad.student_count, bad.special_needs_count, bad.class_count), (0, 0, 0));
        assert_eq!(bad.students_per_class, None);

        // Genuine zeros on row 2 leave no trace.
        assert_eq!(table.issues.len(), 2);
        assert!(table.issues.iter().all(|i| i.row == 1));
        assert_eq!(table.issues[0].column, COL_STUDENTS_COMBINED);
        assert_eq!(table.issues[0].raw, "unknown");
        assert!(matches!(table.issues[0].error, FieldError::NoMatch { .. }));
        assert_eq!(table.issues[1].column, COL_CLASSES_COMBINED);
    }

    #[test]
    fn test_short_row_is_kept_and_recorded() {
        let dir = TempDir::new().unwrap();
        let body = format!(
            "{HEADER}천안,a,공립,120(5),5(1),24.0\n천안,b,공립,80(0)\n아산,c,공립,200(0),8,25.0\n"
        );
        let path = write(&dir, "short.csv", &body);

        let table = load_level(&path, SchoolLevel::Elementary).unwrap();
        assert_eq!(table.len(), 3);

        let short = &table.records[1];
        assert_eq!(short.name, "b");
        assert_eq!((short.student_count, short.special_needs_count), (80, 0));
        assert_eq!(short.class_count, 0);
        assert_eq!(short.students_per_class, None);

        let missing: Vec<&str> = table.issues.iter().map(|i| i.column.as_str()).collect();
        assert_eq!(missing, [COL_CLASSES_COMBINED, COL_STUDENTS_PER_CLASS]);
        assert!(table
            .issues
            .iter()
            .all(|i| i.row == 2 && i.error == FieldError::MissingCell));
        assert_eq!(table.records[2].student_count, 200);
    }

    #[test]
    fn test_special_above_total_keeps_total() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "over.csv", &format!("{HEADER}천안,a,공립,5(9),1,5.0\n"));

        let table = load_level(&path, SchoolLevel::Middle).unwrap();
        let rec = &table.records[0];
        assert_eq!((rec.student_count, rec.special_needs_count), (5, 0));
        assert_eq!(table.issues.len(), 1);
        assert_eq!(
            table.issues[0].error,
            FieldError::SpecialExceedsTotal { total: 5, special: 9 }
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_level(&dir.path().join("absent.csv"), SchoolLevel::Elementary).unwrap_err();
        assert!(err.is_missing_file());
        assert!(load_raw(&dir.path().join("absent.csv")).unwrap_err().is_missing_file());
    }

    #[test]
    fn test_missing_column() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cols.csv", "지역,학교명\n천안,a\n");
        match load_level(&path, SchoolLevel::Elementary) {
            Err(CensusError::MissingColumn { column, .. }) => assert_eq!(column, COL_ESTABLISHMENT),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_load_raw() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "raw.csv", "\u{feff}a,b,c\n1,2,3\n4,5\n");
        let raw = load_raw(&path).unwrap();
        assert_eq!(raw.headers, vec!["a", "b", "c"]);
        assert_eq!(raw.len(), 2);
        assert_eq!(raw.rows[1], vec!["4", "5"]);
    }
}
