//! Load → aggregate → distribute → sample → export over real files.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use school_census::config::DataFiles;
use school_census::data::aggregate::aggregate;
use school_census::data::distribution::build_distribution;
use school_census::data::export;
use school_census::data::filter::SampleCriteria;
use school_census::data::loader::load_levels;
use school_census::data::sample::sample;
use school_census::{CensusConfig, CensusError, SchoolLevel};

const HEADER: &str = "지역,학교명,설립구분,학생수(계),학급수(계),학급당학생수\n";

fn write_level(files: &DataFiles, level: SchoolLevel, rows: &[&str]) {
    let mut body = format!("\u{feff}{HEADER}");
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    fs::write(files.path(level), body).unwrap();
}

fn config_in(dir: &Path) -> CensusConfig {
    CensusConfig {
        files: DataFiles::in_dir(dir),
        aggregate_output: dir.join("out").join("aggregated.csv"),
        ..CensusConfig::default()
    }
}

#[test]
fn test_region_totals_and_distribution() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    write_level(
        &config.files,
        SchoolLevel::Elementary,
        &[
            "충청남도 천안시,가초,공립,120(5),5(1),24.0",
            "충청남도 천안시,나초,공립,80(0),4,20.0",
            "충청남도 아산시,다초,사립,200(0),8,25.0",
        ],
    );
    write_level(&config.files, SchoolLevel::Middle, &["충청남도 아산시,라중,공립,300(2),10(1),30.0"]);
    write_level(&config.files, SchoolLevel::High, &[]);

    let (tables, errors) = load_levels(&config, &SchoolLevel::CORE);
    assert!(errors.is_empty(), "{errors:?}");

    let agg = aggregate(&tables, &config.region_prefix, &config.total_label);
    let regions: Vec<&str> = agg.rows.iter().map(|r| r.region.as_str()).collect();
    assert_eq!(regions, ["아산시", "천안시"]);

    let cheonan = &agg.rows[1];
    assert_eq!(cheonan.schools, [2, 0, 0]);
    assert_eq!(cheonan.students, [200, 0, 0]);
    let asan = &agg.rows[0];
    assert_eq!(asan.schools, [1, 1, 0]);
    assert_eq!(asan.students, [200, 300, 0]);

    assert_eq!(agg.total.region, "합계");
    assert_eq!(agg.total.schools, [3, 1, 0]);
    assert_eq!(agg.total.students, [400, 300, 0]);

    let elem = build_distribution(&agg, SchoolLevel::Elementary).unwrap();
    assert_eq!(elem[0].region, "천안시");
    assert!((elem[0].school_ratio - 2.0 / 3.0).abs() < 1e-9);
    assert!((elem[0].student_ratio - 0.5).abs() < 1e-9);
    assert_eq!(elem[1].region, "아산시");
    assert!((elem[1].school_ratio - 1.0 / 3.0).abs() < 1e-9);
    assert!((elem[1].student_ratio - 0.5).abs() < 1e-9);

    // No high schools at all: ratios fall back to zero.
    let high = build_distribution(&agg, SchoolLevel::High).unwrap();
    assert!(high.iter().all(|r| r.school_ratio == 0.0 && r.student_ratio == 0.0));
}

#[test]
fn test_missing_level_still_aggregates() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    write_level(&config.files, SchoolLevel::Elementary, &["천안시,가초,공립,50(0),2,25.0"]);

    let (tables, errors) = load_levels(&config, &SchoolLevel::CORE);
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(CensusError::is_missing_file));

    let agg = aggregate(&tables, &config.region_prefix, &config.total_label);
    assert_eq!(agg.rows.len(), 1);
    assert_eq!(agg.rows[0].schools, [1, 0, 0]);
    assert_eq!(agg.total.students, [50, 0, 0]);
}

#[test]
fn test_sample_is_reproducible() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    let rows: Vec<String> = (0..40)
        .map(|i| format!("천안시,학교{i},공립,{}({}),10,20.0", 100 + i * 10, i % 3))
        .collect();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    for level in SchoolLevel::CORE {
        write_level(&config.files, level, &rows);
    }

    let (tables, _) = load_levels(&config, &SchoolLevel::CORE);
    let criteria = SampleCriteria::new(200, true, 10).unwrap();

    let first = sample(&tables, &criteria, config.seed);
    let second = sample(&tables, &criteria, config.seed);
    assert_eq!(first, second);

    for level in SchoolLevel::CORE {
        let n = first.count_of(level);
        assert!(n >= 1);
    }
    assert!(first
        .schools
        .iter()
        .all(|s| s.record.student_count >= 200 && s.record.special_needs_count > 0));
}

#[test]
fn test_saved_aggregate_reads_back() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    write_level(&config.files, SchoolLevel::Middle, &["충청남도 공주시,가중,공립,\"1,050(3)\",30(1),35.0"]);

    let (tables, _) = load_levels(&config, &SchoolLevel::CORE);
    let agg = aggregate(&tables, &config.region_prefix, &config.total_label);
    export::save_aggregate(&config.aggregate_output, &agg).unwrap();

    let bytes = fs::read(&config.aggregate_output).unwrap();
    assert!(bytes.starts_with("\u{feff}".as_bytes()));

    let mut reader = csv::Reader::from_reader(&bytes[3..]);
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, export::aggregate_headers());

    let records: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], ["공주시", "0", "1", "0", "0", "1050", "0"]);
    assert_eq!(records[1][0], "합계");
}
