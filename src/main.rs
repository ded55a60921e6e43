mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::CensusApp;
use eframe::egui;
use school_census::config::{CONFIG_ENV, DEFAULT_CONFIG_PATH};
use school_census::CensusConfig;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config_path = std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let mut state = AppState::new(CensusConfig::default(), config_path.clone());
    match CensusConfig::load_or_default(&config_path) {
        Ok(config) => state.config = config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            state.status_message = Some(format!("Error: {e}"));
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "School Census – 충청남도교육청 학교 현황",
        options,
        Box::new(|cc| {
            app::install_korean_font(&cc.egui_ctx);
            Ok(Box::new(CensusApp { state }))
        }),
    )
}
