use eframe::egui::{self, Color32, RichText, Ui};

use school_census::data::export;
use school_census::data::stats::{histogram, schools_per_region, summarize};
use school_census::SchoolLevel;

use crate::color::level_color;
use crate::state::{AppState, CoreView};
use crate::ui::{panels, plot, tables};

const STUDENT_BINS: usize = 40;
const PER_CLASS_BINS: usize = 20;

/// Open questions for the survey design, shown under the summary.
const DISCUSSION: [(&str, &str); 3] = [
    (
        "1. 현재 예산으로 설문은 최대 몇 명까지 가능한가요?",
        "- 인쇄 비용, 온라인 툴 라이선스, 연구자 수 등을 고려했을 때 실질적으로 가능한 학생 수는 몇 명인가요?",
    ),
    (
        "2. 한 학교를 정할 경우 전교생을 대상으로 할 것인가요?",
        "- 학년/학급 단위로 설문할 수도 있는데, 학교 측 협조가 가능한지 확인이 필요합니다.",
    ),
    (
        "3. 무작위로 뽑는 기준이 정해져 있나요?",
        "- 지역별 균형, 학교급 비율, 성별 등을 고려한 표본 추출 기준이 마련되어 있나요?",
    ),
];

fn warn(ui: &mut Ui, text: impl Into<String>) {
    ui.label(RichText::new(text.into()).color(Color32::YELLOW));
}

fn warn_load_errors(ui: &mut Ui, view: &CoreView) {
    for e in view.errors.values() {
        warn(ui, e.to_string());
    }
}

// ---------------------------------------------------------------------------
// Overview: raw file preview
// ---------------------------------------------------------------------------

pub fn overview(ui: &mut Ui, state: &mut AppState) {
    let level = state.preview_level;
    ui.heading("2025년도 충청남도교육청 학교 현황 조회");
    match state.preview() {
        Ok(raw) => {
            ui.strong(format!("{} 데이터 미리보기 ({}건)", level.label(), raw.len()));
            tables::raw_table(ui, "raw_preview", raw);
        }
        Err(e) => warn(ui, e.clone()),
    }
}

// ---------------------------------------------------------------------------
// Explore: normalised table, histograms, schools per region
// ---------------------------------------------------------------------------

pub fn explore(ui: &mut Ui, state: &mut AppState) {
    let level = state.explore_level;
    let view = state.core_view();
    let Some(table) = view.tables.get(&level) else {
        if let Some(e) = view.errors.get(&level) {
            warn(ui, e.to_string());
        }
        return;
    };
    let color = level_color(level);

    ui.heading(format!("{} 데이터 요약", level.label()));
    tables::level_table(ui, "level_table", table);
    ui.label(format!("총 {}개 학교 표시됨", table.len()));

    if !table.issues.is_empty() {
        egui::CollapsingHeader::new(
            RichText::new(format!("형식 오류로 0 처리된 값 ({}건)", table.issues.len()))
                .color(Color32::YELLOW),
        )
        .id_salt("field_issues")
        .show(ui, |ui: &mut Ui| {
            for issue in &table.issues {
                ui.small(issue.to_string());
            }
        });
    }

    ui.separator();
    ui.strong("학생 수 구간별 학교 수");
    let students: Vec<f64> = table.records.iter().map(|r| f64::from(r.student_count)).collect();
    plot::histogram_plot(ui, "students_hist", "학생 수", &histogram(&students, STUDENT_BINS), color);

    ui.strong("학급당 학생 수 분포");
    let per_class: Vec<f64> = table.records.iter().filter_map(|r| r.students_per_class).collect();
    plot::histogram_plot(
        ui,
        "per_class_hist",
        "학급당 학생 수",
        &histogram(&per_class, PER_CLASS_BINS),
        color,
    );

    ui.strong("지역별 학교 수 분포");
    plot::region_bar_chart(ui, "region_bars", &schools_per_region(table), color);
}

// ---------------------------------------------------------------------------
// Summary: headline numbers per core level
// ---------------------------------------------------------------------------

pub fn summary(ui: &mut Ui, state: &mut AppState) {
    ui.heading("데이터 요약");
    let view = state.core_view();
    for level in SchoolLevel::CORE {
        ui.add_space(6.0);
        ui.strong(level.label());
        match (view.tables.get(&level), view.errors.get(&level)) {
            (Some(table), _) => {
                let s = summarize(table);
                ui.label(format!(
                    "- 총 학교 수: {}개 (특수학생 포함 학교: {}개)",
                    s.total_schools, s.special_needs_schools
                ));
                let mean = s
                    .mean_students
                    .map(|m| format!("{m:.1}명"))
                    .unwrap_or_else(|| "-".to_string());
                ui.label(format!("- 평균 학생 수: {mean}"));
            }
            (None, Some(e)) if !e.is_missing_file() => warn(ui, e.to_string()),
            (None, _) => {
                ui.label("- 총 학교 수: 파일 없음");
            }
        }
    }

    ui.add_space(12.0);
    ui.separator();
    ui.heading("설문 및 표본 설계 관련 논의");
    for (question, detail) in DISCUSSION {
        ui.add_space(6.0);
        ui.strong(question);
        ui.label(detail);
    }
}

// ---------------------------------------------------------------------------
// Sampler: eligible counts, draw, export
// ---------------------------------------------------------------------------

pub fn sampler(ui: &mut Ui, state: &mut AppState) {
    ui.heading("무작위 표본 추출기 (초/중/고등학교)");

    let counts = match state.eligible_counts() {
        Ok(c) => c,
        Err(e) => {
            warn(ui, e.to_string());
            return;
        }
    };
    warn_load_errors(ui, &state.core_view());

    ui.strong("필터 조건에 따른 대상 학교 수");
    for (level, n) in counts {
        ui.label(format!("- {}: {n}개", level.label()));
    }

    ui.add_space(8.0);
    if ui.button("표본 추출하기").clicked() {
        state.draw_sample();
    }

    let Some(sample) = state.sample.clone() else {
        return;
    };
    ui.separator();
    ui.strong("추출된 학교 목록");
    if sample.is_empty() {
        warn(ui, "조건을 만족하는 표본이 없습니다.");
        return;
    }
    tables::sample_table(ui, "sample_table", &sample);
    if ui.button("CSV로 저장").clicked() {
        panels::save_csv_dialog(state, "표본추출_학교목록.csv", export::sample_bytes(&sample));
    }
}

// ---------------------------------------------------------------------------
// Population: region aggregate and per-level distributions
// ---------------------------------------------------------------------------

pub fn population(ui: &mut Ui, state: &mut AppState) {
    ui.heading("지역별 학교/학생 수 집계");
    ui.label("초·중·고 학교 수와 학생 수를 지역별로 집계한 표입니다.");

    let view = state.core_view();
    warn_load_errors(ui, &view);
    let aggregate = &view.aggregate;

    tables::aggregate_table(ui, "aggregate_table", aggregate);
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("전체 집계 CSV 저장").clicked() {
            panels::save_csv_dialog(
                state,
                "aggregated_population_by_region.csv",
                export::aggregate_bytes(aggregate),
            );
        }
        let output = state.config.aggregate_output.clone();
        if ui.button(format!("{}에 기록", output.display())).clicked() {
            match export::save_aggregate(&output, aggregate) {
                Ok(()) => state.notice = Some(format!("Saved {}", output.display())),
                Err(e) => state.status_message = Some(format!("Error: {e}")),
            }
        }
    });

    ui.separator();
    for level in SchoolLevel::CORE {
        let Some(rows) = view.distributions.get(&level) else {
            continue;
        };
        egui::CollapsingHeader::new(format!("{}: 지역별 학교수·학생수 분포", level.label()))
            .id_salt(level.code())
            .default_open(level == SchoolLevel::Elementary)
            .show(ui, |ui: &mut Ui| {
                tables::distribution_table(ui, &format!("distribution_{}", level.code()), rows);
                if ui.button(format!("{} 분포표 CSV 저장", level.label())).clicked() {
                    panels::save_csv_dialog(
                        state,
                        &format!("{}_distribution_by_region.csv", level.column_prefix()),
                        export::distribution_bytes(rows),
                    );
                }
            });
    }
}
