use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use school_census::data::export::{aggregate_headers, DISTRIBUTION_HEADERS, SAMPLE_HEADERS};
use school_census::{DistributionRow, LevelTable, RawTable, RegionAggregate, SampleSet};

// ---------------------------------------------------------------------------
// Generic text table
// ---------------------------------------------------------------------------

/// Render `rows × headers.len()` cells produced by `cell(row, col)`.
fn text_table<H: AsRef<str>>(
    ui: &mut Ui,
    id: &str,
    headers: &[H],
    rows: usize,
    mut cell: impl FnMut(usize, usize) -> String,
) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(360.0)
            .columns(Column::auto().at_least(60.0), headers.len())
            .header(22.0, |mut header| {
                for h in headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(h.as_ref());
                    });
                }
            })
            .body(|body| {
                body.rows(20.0, rows, |mut row| {
                    let i = row.index();
                    for c in 0..headers.len() {
                        let text = cell(i, c);
                        row.col(|ui: &mut Ui| {
                            ui.label(text);
                        });
                    }
                });
            });
    });
}

fn opt_decimal(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.1}")).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Concrete tables
// ---------------------------------------------------------------------------

pub fn raw_table(ui: &mut Ui, id: &str, table: &RawTable) {
    text_table(ui, id, &table.headers, table.len(), |r, c| {
        table.rows[r].get(c).cloned().unwrap_or_default()
    });
}

pub fn level_table(ui: &mut Ui, id: &str, table: &LevelTable) {
    const HEADERS: [&str; 7] = ["지역", "학교명", "설립구분", "학급수", "학생수", "특수학생수", "학급당학생수"];
    text_table(ui, id, &HEADERS, table.len(), |r, c| {
        let rec = &table.records[r];
        match c {
            0 => rec.region.clone(),
            1 => rec.name.clone(),
            2 => rec.establishment.clone(),
            3 => rec.class_count.to_string(),
            4 => rec.student_count.to_string(),
            5 => rec.special_needs_count.to_string(),
            _ => opt_decimal(rec.students_per_class),
        }
    });
}

pub fn aggregate_table(ui: &mut Ui, id: &str, aggregate: &RegionAggregate) {
    let rows: Vec<_> = aggregate.iter_with_total().collect();
    text_table(ui, id, &aggregate_headers(), rows.len(), |r, c| {
        let row = rows[r];
        match c {
            0 => row.region.clone(),
            1..=3 => row.schools[c - 1].to_string(),
            _ => row.students[c - 4].to_string(),
        }
    });
}

/// Ratios are shown as percentages; exports keep the raw fraction.
pub fn distribution_table(ui: &mut Ui, id: &str, rows: &[DistributionRow]) {
    text_table(ui, id, &DISTRIBUTION_HEADERS, rows.len(), |r, c| {
        let row = &rows[r];
        match c {
            0 => row.region.clone(),
            1 => row.schools.to_string(),
            2 => row.students.to_string(),
            3 => format!("{:.2}%", row.school_ratio * 100.0),
            _ => format!("{:.2}%", row.student_ratio * 100.0),
        }
    });
}

pub fn sample_table(ui: &mut Ui, id: &str, sample: &SampleSet) {
    text_table(ui, id, &SAMPLE_HEADERS, sample.len(), |r, c| {
        let s = &sample.schools[r];
        match c {
            0 => s.level.code().to_string(),
            1 => s.record.name.clone(),
            2 => s.record.establishment.clone(),
            3 => s.record.student_count.to_string(),
            4 => s.record.special_needs_count.to_string(),
            _ => opt_decimal(s.record.students_per_class),
        }
    });
}
