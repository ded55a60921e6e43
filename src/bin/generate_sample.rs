//! Writes synthetic level files in the published column layout.
//!
//! ```text
//! cargo run --bin generate_sample -- [output-dir]
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use school_census::config::DataFiles;
use school_census::data::loader::{
    COL_CLASSES_COMBINED, COL_ESTABLISHMENT, COL_REGION, COL_SCHOOL_NAME, COL_STUDENTS_COMBINED,
    COL_STUDENTS_PER_CLASS,
};
use school_census::SchoolLevel;

const REGIONS: [&str; 15] = [
    "천안시", "공주시", "보령시", "아산시", "서산시", "논산시", "계룡시", "당진시", "금산군",
    "부여군", "서천군", "청양군", "홍성군", "예산군", "태안군",
];

const ESTABLISHMENTS: [&str; 3] = ["공립", "사립", "국립"];

/// (schools, min students, max students) per level.
fn profile(level: SchoolLevel) -> (usize, u32, u32) {
    match level {
        SchoolLevel::Elementary => (410, 5, 1600),
        SchoolLevel::Middle => (190, 10, 1100),
        SchoolLevel::High => (120, 40, 1300),
        SchoolLevel::Special => (16, 30, 250),
        SchoolLevel::Various => (4, 20, 300),
        SchoolLevel::Other => (6, 10, 200),
    }
}

/// `1,204` style thousands separators.
fn with_commas(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn main() -> Result<()> {
    env_logger::init();

    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let files = DataFiles::in_dir(&dir);
    let mut rng = StdRng::seed_from_u64(42);

    for level in SchoolLevel::ALL {
        let path = files.path(level);
        let (count, min, max) = profile(level);

        let mut out = Vec::from("\u{feff}".as_bytes());
        {
            let mut writer = csv::Writer::from_writer(&mut out);
            writer.write_record([
                COL_REGION,
                COL_SCHOOL_NAME,
                COL_ESTABLISHMENT,
                COL_STUDENTS_COMBINED,
                COL_CLASSES_COMBINED,
                COL_STUDENTS_PER_CLASS,
            ])?;

            for i in 0..count {
                let region = REGIONS[rng.random_range(0..REGIONS.len())];
                let establishment = ESTABLISHMENTS[rng.random_range(0..ESTABLISHMENTS.len())];
                let students = rng.random_range(min..=max);
                let special = if rng.random_bool(0.6) {
                    rng.random_range(0..=(students / 40).max(1)).min(students)
                } else {
                    0
                };
                let classes = (students / 24).max(1);
                let special_classes = u32::from(special > 0);
                let per_class = f64::from(students) / f64::from(classes);

                writer.write_record([
                    format!("충청남도 {region}"),
                    format!("{}{}{}", &region[..region.len() - 3], i + 1, level.code()),
                    establishment.to_string(),
                    format!("{}({special})", with_commas(students)),
                    format!("{classes}({special_classes})"),
                    format!("{per_class:.1}"),
                ])?;
            }
            writer.flush()?;
        }

        std::fs::write(path, &out).with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {count} {} schools to {}", level.label(), path.display());
    }

    Ok(())
}
