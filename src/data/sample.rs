use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

use super::filter::{eligible, SampleCriteria};
use super::model::{LevelTables, SampleSet, SampledSchool, SchoolLevel};

/// Number of schools to draw from `eligible` candidates.
///
/// `max(1, round(eligible × percent / 100))` for a non-empty pool, `0`
/// otherwise. Halves round to even (`2.5 → 2`, `3.5 → 4`).
pub fn sample_size(eligible: usize, percent: u8) -> usize {
    if eligible == 0 {
        return 0;
    }
    let scaled = eligible * usize::from(percent);
    let (quotient, remainder) = (scaled / 100, scaled % 100);
    let rounded = match remainder {
        r if r > 50 => quotient + 1,
        50 if quotient % 2 == 1 => quotient + 1,
        _ => quotient,
    };
    rounded.clamp(1, eligible)
}

/// Draw a proportional sample from every core level.
///
/// Each level is filtered by `criteria`, then drawn without replacement
/// using a fresh [`StdRng`] seeded with `seed`, so identical tables,
/// criteria and seed always give the identical sample. Levels are
/// concatenated in [`SchoolLevel::CORE`] order; an empty result is valid.
pub fn sample(tables: &LevelTables, criteria: &SampleCriteria, seed: u64) -> SampleSet {
    let mut schools = Vec::new();

    for level in SchoolLevel::CORE {
        let Some(table) = tables.get(&level) else {
            continue;
        };
        let pool = eligible(table, criteria);
        let n = sample_size(pool.len(), criteria.sample_percent());
        if n == 0 {
            continue;
        }

        let mut rng = StdRng::seed_from_u64(seed);
        schools.extend(
            index::sample(&mut rng, pool.len(), n)
                .into_iter()
                .map(|i| SampledSchool {
                    level,
                    record: pool[i].clone(),
                }),
        );
        log::info!("Sampled {n} of {} eligible {} schools", pool.len(), level.label());
    }

    SampleSet { schools }
}
