use eframe::egui::{self, Color32, RichText, Ui};

use school_census::data::export;
use school_census::data::filter::{MIN_STUDENTS_RANGE, SAMPLE_PERCENT_RANGE};
use school_census::SchoolLevel;

use crate::state::{AppState, Page};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu, page tabs and status line.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Reload configuration").clicked() {
                state.reload_config();
                ui.close_menu();
            }
            if ui.button("Reload data files").clicked() {
                state.reload_data();
                ui.close_menu();
            }
        });

        ui.separator();

        for page in Page::ALL {
            if ui.selectable_label(state.page == page, page.title()).clicked() {
                state.page = page;
            }
        }

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        } else if let Some(msg) = &state.notice {
            ui.label(RichText::new(msg).color(Color32::LIGHT_GREEN));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – page controls
// ---------------------------------------------------------------------------

/// Render the controls of the current page.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading(state.page.title());
    ui.separator();

    match state.page {
        Page::Overview => {
            ui.strong("학교급 선택");
            level_combo(ui, "preview_level", &mut state.preview_level, &SchoolLevel::ALL);
            data_file_label(ui, state, state.preview_level);
        }
        Page::Explore => {
            ui.strong("학교급 선택");
            level_combo(ui, "explore_level", &mut state.explore_level, &SchoolLevel::CORE);
            data_file_label(ui, state, state.explore_level);
        }
        Page::Sampler => {
            let mut changed = false;
            changed |= ui
                .add(
                    egui::Slider::new(&mut state.min_students, MIN_STUDENTS_RANGE)
                        .step_by(20.0)
                        .text("학생 수 최소 기준"),
                )
                .changed();
            changed |= ui
                .checkbox(&mut state.special_only, "특수학생이 있는 학교만 포함")
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut state.sample_percent, SAMPLE_PERCENT_RANGE)
                        .text("표본 비율 (%)"),
                )
                .changed();
            if changed {
                state.controls_changed();
            }
            ui.separator();
            ui.label(format!("Seed: {}", state.config.seed));
        }
        Page::Summary | Page::Population => {
            for level in SchoolLevel::CORE {
                data_file_label(ui, state, level);
            }
        }
    }
}

fn level_combo(ui: &mut Ui, id: &str, selected: &mut SchoolLevel, levels: &[SchoolLevel]) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected.label())
        .show_ui(ui, |ui: &mut Ui| {
            for &level in levels {
                ui.selectable_value(selected, level, level.label());
            }
        });
}

fn data_file_label(ui: &mut Ui, state: &AppState, level: SchoolLevel) {
    let path = state.config.files.path(level);
    let text = format!("{}: {}", level.label(), path.display());
    if path.exists() {
        ui.small(text);
    } else {
        ui.small(RichText::new(text).color(Color32::YELLOW));
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Ask for a destination and write an export there.
pub fn save_csv_dialog(state: &mut AppState, default_name: &str, bytes: school_census::Result<Vec<u8>>) {
    let bytes = match bytes {
        Ok(b) => b,
        Err(e) => {
            log::error!("Failed to build export: {e}");
            state.status_message = Some(format!("Error: {e}"));
            return;
        }
    };

    let file = rfd::FileDialog::new()
        .set_title("CSV 저장")
        .add_filter("CSV", &["csv"])
        .set_file_name(default_name)
        .save_file();

    if let Some(path) = file {
        match export::save(&path, &bytes) {
            Ok(()) => {
                state.status_message = None;
                state.notice = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to save export: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
