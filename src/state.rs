use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;

use school_census::data::aggregate::aggregate;
use school_census::data::cache::TableCache;
use school_census::data::distribution::build_distribution;
use school_census::data::filter::{eligible_counts, SampleCriteria};
use school_census::data::loader::load_raw;
use school_census::data::sample::sample;
use school_census::{
    CensusConfig, CensusError, DistributionRow, LevelTables, RawTable, RegionAggregate, SampleSet,
    SchoolLevel,
};

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Overview,
    Explore,
    Summary,
    Sampler,
    Population,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Overview,
        Page::Explore,
        Page::Summary,
        Page::Sampler,
        Page::Population,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::Overview => "학교 현황",
            Page::Explore => "탐색적 분석",
            Page::Summary => "데이터 요약",
            Page::Sampler => "표본 추출",
            Page::Population => "지역별 집계",
        }
    }
}

// ---------------------------------------------------------------------------
// Derived core-level data
// ---------------------------------------------------------------------------

/// Core tables and everything computed from them, built once per data load.
pub struct CoreView {
    pub tables: LevelTables,
    /// Levels whose file could not be loaded.
    pub errors: BTreeMap<SchoolLevel, CensusError>,
    pub aggregate: RegionAggregate,
    pub distributions: BTreeMap<SchoolLevel, Vec<DistributionRow>>,
}

impl CoreView {
    fn build(cache: &mut TableCache, config: &CensusConfig) -> Self {
        let mut tables = LevelTables::new();
        let mut errors = BTreeMap::new();
        for level in SchoolLevel::CORE {
            match cache.load(config.files.path(level), level) {
                Ok(table) => {
                    tables.insert(level, table);
                }
                Err(e) => {
                    log::warn!("Skipping {level}: {e}");
                    errors.insert(level, e);
                }
            }
        }

        let aggregate = aggregate(&tables, &config.region_prefix, &config.total_label);
        let mut distributions = BTreeMap::new();
        for level in SchoolLevel::CORE {
            match build_distribution(&aggregate, level) {
                Ok(rows) => {
                    distributions.insert(level, rows);
                }
                Err(e) => log::error!("{e}"),
            }
        }

        Self {
            tables,
            errors,
            aggregate,
            distributions,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: CensusConfig,
    pub config_path: PathBuf,

    /// Memoised level tables (path + mtime).
    cache: TableCache,

    /// Derived core data; dropped on reload.
    core: Option<Rc<CoreView>>,

    /// Eligible count per core level for the current sampler controls.
    eligible: Option<BTreeMap<SchoolLevel, usize>>,

    /// Raw preview of the overview level, refreshed when the level changes.
    preview: Option<(SchoolLevel, Result<RawTable, String>)>,

    pub page: Page,

    /// Level shown on the overview page (any of the six).
    pub preview_level: SchoolLevel,

    /// Level shown on the exploration page (core levels only).
    pub explore_level: SchoolLevel,

    // Sampler controls
    pub min_students: u32,
    pub special_only: bool,
    pub sample_percent: u8,

    /// Result of the last "draw" click; cleared whenever a control changes.
    pub sample: Option<SampleSet>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Last successful action (e.g. a saved export).
    pub notice: Option<String>,
}

impl AppState {
    pub fn new(config: CensusConfig, config_path: PathBuf) -> Self {
        let defaults = SampleCriteria::default();
        Self {
            config,
            config_path,
            cache: TableCache::new(),
            core: None,
            eligible: None,
            preview: None,
            page: Page::Overview,
            preview_level: SchoolLevel::Elementary,
            explore_level: SchoolLevel::Elementary,
            min_students: defaults.min_students(),
            special_only: defaults.require_special_needs(),
            sample_percent: defaults.sample_percent(),
            sample: None,
            status_message: None,
            notice: None,
        }
    }

    /// Re-read the config file and drop everything derived from the old one.
    pub fn reload_config(&mut self) {
        match CensusConfig::load_or_default(&self.config_path) {
            Ok(config) => {
                log::info!("Reloaded configuration from {}", self.config_path.display());
                self.config = config;
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to reload configuration: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
        self.cache.clear();
        self.reload_data();
    }

    /// Forget derived data so the next page draw re-reads changed files.
    pub fn reload_data(&mut self) {
        self.core = None;
        self.eligible = None;
        self.preview = None;
        self.sample = None;
    }

    /// A sampler control changed: the eligible counts and the drawn sample
    /// no longer apply.
    pub fn controls_changed(&mut self) {
        self.eligible = None;
        self.sample = None;
    }

    /// Raw rows of the overview level.
    pub fn preview(&mut self) -> &Result<RawTable, String> {
        let level = self.preview_level;
        if matches!(&self.preview, Some((l, _)) if *l != level) {
            self.preview = None;
        }
        let path = self.config.files.path(level);
        let (_, table) = self
            .preview
            .get_or_insert_with(|| (level, load_raw(path).map_err(|e| e.to_string())));
        table
    }

    /// Core tables with their aggregate and distributions, built on first
    /// use after a reload.
    pub fn core_view(&mut self) -> Rc<CoreView> {
        if let Some(view) = &self.core {
            return Rc::clone(view);
        }
        let view = Rc::new(CoreView::build(&mut self.cache, &self.config));
        self.core = Some(Rc::clone(&view));
        view
    }

    /// Eligible schools per core level under the current controls.
    pub fn eligible_counts(&mut self) -> Result<BTreeMap<SchoolLevel, usize>, CensusError> {
        if let Some(counts) = &self.eligible {
            return Ok(counts.clone());
        }
        let criteria = self.criteria()?;
        let counts = eligible_counts(&self.core_view().tables, &criteria);
        self.eligible = Some(counts.clone());
        Ok(counts)
    }

    pub fn criteria(&self) -> Result<SampleCriteria, CensusError> {
        SampleCriteria::new(self.min_students, self.special_only, self.sample_percent)
    }

    /// Draw a new sample with the configured seed.
    pub fn draw_sample(&mut self) {
        let criteria = match self.criteria() {
            Ok(c) => c,
            Err(e) => {
                self.status_message = Some(format!("Error: {e}"));
                return;
            }
        };
        let view = self.core_view();
        self.sample = Some(sample(&view.tables, &criteria, self.config.seed));
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};
    use std::time::{Duration, SystemTime};

    use school_census::config::DataFiles;
    use tempfile::TempDir;

    use super::*;

    const HEADER: &str = "지역,학교명,설립구분,학생수(계),학급수(계),학급당학생수\n";

    fn state_in(dir: &TempDir) -> AppState {
        let config = CensusConfig {
            files: DataFiles::in_dir(dir.path()),
            ..CensusConfig::default()
        };
        AppState::new(config, dir.path().join("census.json"))
    }

    fn write_elementary(state: &AppState, rows: &str) {
        let path = state.config.files.path(SchoolLevel::Elementary);
        fs::write(path, format!("{HEADER}{rows}")).unwrap();
    }

    #[test]
    fn test_core_view_is_built_once_per_load() {
        let dir = TempDir::new().unwrap();
        let mut state = state_in(&dir);
        write_elementary(&state, "천안시,가초,공립,120(5),5,24.0\n");

        let first = state.core_view();
        assert_eq!(first.aggregate.total.students, [120, 0, 0]);
        assert_eq!(first.errors.len(), 2);
        assert!(first.distributions.contains_key(&SchoolLevel::Elementary));

        // Unchanged until the data is explicitly reloaded.
        write_elementary(&state, "천안시,가초,공립,120(5),5,24.0\n아산시,나초,공립,80(0),4,20.0\n");
        let later = SystemTime::now() + Duration::from_secs(5);
        File::options()
            .write(true)
            .open(state.config.files.path(SchoolLevel::Elementary))
            .unwrap()
            .set_modified(later)
            .unwrap();
        assert!(Rc::ptr_eq(&first, &state.core_view()));

        state.reload_data();
        let second = state.core_view();
        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(second.aggregate.rows.len(), 2);
    }

    #[test]
    fn test_eligible_counts_follow_controls() {
        let dir = TempDir::new().unwrap();
        let mut state = state_in(&dir);
        write_elementary(&state, "천안시,가초,공립,120(5),5,24.0\n아산시,나초,공립,80(0),4,20.0\n");
        state.min_students = 0;
        state.special_only = false;

        let counts = state.eligible_counts().unwrap();
        assert_eq!(counts[&SchoolLevel::Elementary], 2);

        state.special_only = true;
        assert_eq!(state.eligible_counts().unwrap()[&SchoolLevel::Elementary], 2);

        state.controls_changed();
        assert_eq!(state.eligible_counts().unwrap()[&SchoolLevel::Elementary], 1);
    }

    #[test]
    fn test_drawn_sample_is_cleared_by_control_change() {
        let dir = TempDir::new().unwrap();
        let mut state = state_in(&dir);
        write_elementary(&state, "천안시,가초,공립,120(5),5,24.0\n");
        state.min_students = 0;

        state.draw_sample();
        assert_eq!(state.sample.as_ref().map(SampleSet::len), Some(1));

        state.controls_changed();
        assert!(state.sample.is_none());
    }
}
