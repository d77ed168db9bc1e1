//! Cohort tracker: births, yearly child mortality and coming of age.
//!
//! A cumulative mortality target `M` over the coming-of-age span `Y` gives a
//! constant per-year rate `1 - (1 - M)^(1/Y)` per birth path. Each crossed
//! year boundary is processed exactly once, in order, guarded by
//! `last_year_rolled`. At the coming-of-age boundary surviving daughters
//! deploy out of the cohort; the outcome is reported but never touches the
//! mother's death gate.

use matriline_types::{BirthPath, Cohort, CohortId};
use tracing::debug;

use crate::config::{CohortConfig, EngineConfig};
use crate::random::RandomSource;

/// Per-year death probability reaching `cumulative` after `years` years.
pub fn per_year_mortality(cumulative: f64, years: u32) -> f64 {
    if years == 0 {
        return cumulative.clamp(0.0, 1.0);
    }
    1.0 - (1.0 - cumulative.clamp(0.0, 1.0)).powf(1.0 / f64::from(years))
}

/// Cumulative mortality target of a birth path.
pub const fn cumulative_mortality(path: BirthPath, config: &CohortConfig) -> f64 {
    match path {
        BirthPath::Baseline => config.baseline_cumulative_mortality,
        BirthPath::Outlander => config.outlander_cumulative_mortality,
        BirthPath::Deployed => config.deployed_cumulative_mortality,
        BirthPath::RatHunter => config.rat_hunter_cumulative_mortality,
    }
}

/// Infant survival for a litter born with `husbands` husbands.
///
/// `min(cap, 1 - (1 - base) * (1 - bonus)^(husbands - 1))`.
pub fn juvenile_survival(husbands: u32, config: &EngineConfig) -> f64 {
    let r = &config.reproduction;
    let extra = i32::try_from(husbands.saturating_sub(1)).unwrap_or(i32::MAX);
    let risk = (1.0 - r.base_juvenile_survival) * (1.0 - r.extra_husband_bonus).powi(extra);
    (1.0 - risk).clamp(0.0, r.juvenile_survival_cap)
}

/// Create a cohort of `litter` newborns.
///
/// Each newborn is female with probability `female_ratio` and survives
/// infancy with probability `survival`; infants who do not are counted dead
/// from the start.
pub fn birth(
    id: CohortId,
    path: BirthPath,
    litter: u32,
    survival: f64,
    female_ratio: f64,
    rng: &mut dyn RandomSource,
) -> Cohort {
    let mut females: u32 = 0;
    let mut dead: u32 = 0;
    let mut dead_females: u32 = 0;
    for _ in 0..litter {
        let female = rng.chance(female_ratio);
        if female {
            females = females.saturating_add(1);
        }
        if !rng.chance(survival) {
            dead = dead.saturating_add(1);
            if female {
                dead_females = dead_females.saturating_add(1);
            }
        }
    }
    Cohort {
        id,
        age_months: 0,
        size: litter,
        females,
        males: litter.saturating_sub(females),
        dead,
        dead_females,
        path,
        last_year_rolled: 0,
        deployed_out: false,
    }
}

/// Deaths recorded while crossing one year boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearDeaths {
    /// The year that was crossed.
    pub year: u32,
    /// Members who died in it.
    pub count: u32,
}

/// Outcome of a cohort's coming of age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComingOfAge {
    /// Daughters who deployed out of the cohort.
    pub deployed: u32,
    /// Deployed daughters who came back proven.
    pub survived: u32,
}

/// Everything one advance did to a cohort.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CohortProgress {
    /// Deaths per crossed year, only years with deaths.
    pub deaths: Vec<YearDeaths>,
    /// Set when the coming-of-age boundary was crossed.
    pub came_of_age: Option<ComingOfAge>,
}

/// Age a cohort by `months` and process every newly crossed year boundary.
pub fn advance(
    cohort: &mut Cohort,
    months: u32,
    config: &CohortConfig,
    rng: &mut dyn RandomSource,
) -> CohortProgress {
    cohort.age_months = cohort.age_months.saturating_add(months);
    let mut progress = CohortProgress::default();
    if cohort.is_inert() {
        return progress;
    }

    let p_year = per_year_mortality(
        cumulative_mortality(cohort.path, config),
        config.coming_of_age_years,
    );
    let last_year = cohort.age_years().min(config.coming_of_age_years);

    while cohort.last_year_rolled < last_year {
        let year = cohort.last_year_rolled.saturating_add(1);
        let count = roll_year(cohort, p_year, rng);
        cohort.last_year_rolled = year;
        if count > 0 {
            debug!(cohort = %cohort.id, year, count, "cohort deaths");
            progress.deaths.push(YearDeaths { year, count });
        }
        if year == config.coming_of_age_years {
            progress.came_of_age = Some(come_of_age(cohort, config, rng));
            break;
        }
    }
    progress
}

/// One Bernoulli trial per surviving member.
fn roll_year(cohort: &mut Cohort, p_year: f64, rng: &mut dyn RandomSource) -> u32 {
    let alive_females = cohort.alive_females();
    let alive = cohort.alive();
    let mut deaths: u32 = 0;
    for member in 0..alive {
        if rng.chance(p_year) {
            deaths = deaths.saturating_add(1);
            if member < alive_females {
                cohort.dead_females = cohort.dead_females.saturating_add(1);
            }
        }
    }
    cohort.dead = cohort.dead.saturating_add(deaths).min(cohort.size);
    deaths
}

/// Deploy surviving daughters out of the cohort.
///
/// On the outlander path only a fraction deploy, at the higher outlander
/// mortality; everywhere else every surviving daughter deploys.
fn come_of_age(cohort: &mut Cohort, config: &CohortConfig, rng: &mut dyn RandomSource) -> ComingOfAge {
    let alive_females = cohort.alive_females();
    let (deploying, mortality) = if cohort.path == BirthPath::Outlander {
        let share = (f64::from(alive_females) * config.outlander_deploy_fraction).floor();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let share = share as u32;
        (share.min(alive_females), config.outlander_deploy_mortality)
    } else {
        (alive_females, config.standard_deploy_mortality)
    };

    let mut survived: u32 = 0;
    for _ in 0..deploying {
        if !rng.chance(mortality) {
            survived = survived.saturating_add(1);
        }
    }

    cohort.size = cohort.size.saturating_sub(deploying);
    cohort.females = cohort.females.saturating_sub(deploying);
    cohort.deployed_out = true;
    ComingOfAge {
        deployed: deploying,
        survived,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ScriptedSource, SeededSource};

    fn cohort(path: BirthPath, size: u32, females: u32) -> Cohort {
        Cohort {
            id: CohortId(0),
            age_months: 0,
            size,
            females,
            males: size.saturating_sub(females),
            dead: 0,
            dead_females: 0,
            path,
            last_year_rolled: 0,
            deployed_out: false,
        }
    }

    #[test]
    fn per_year_rate_compounds_to_target() {
        let p = per_year_mortality(0.30, 16);
        let survival = (1.0 - p).powi(16);
        assert!((survival - 0.70).abs() < 1e-12);
    }

    #[test]
    fn juvenile_survival_improves_with_husbands_and_caps() {
        let config = EngineConfig::default();
        assert!((juvenile_survival(1, &config) - 0.60).abs() < 1e-12);
        assert!((juvenile_survival(2, &config) - 0.64).abs() < 1e-12);
        assert!((juvenile_survival(100, &config) - 0.95).abs() < 1e-12);
    }

    #[test]
    fn birth_counts_are_consistent() {
        // female, survives; male, dies; female, dies
        let mut rng = ScriptedSource::new([0.1, 0.1, 0.9, 0.9, 0.2, 0.99], 0.5);
        let c = birth(CohortId(1), BirthPath::Baseline, 3, 0.6, 0.5, &mut rng);
        assert_eq!(c.size, 3);
        assert_eq!(c.females, 2);
        assert_eq!(c.males, 1);
        assert_eq!(c.dead, 2);
        assert_eq!(c.dead_females, 1);
        assert_eq!(c.alive_females(), 1);
    }

    #[test]
    fn half_year_advance_crosses_no_boundary() {
        let config = CohortConfig::default();
        let mut c = cohort(BirthPath::Baseline, 4, 2);
        let mut rng = ScriptedSource::constant(0.0);
        let progress = advance(&mut c, 6, &config, &mut rng);
        assert!(progress.deaths.is_empty());
        assert_eq!(c.last_year_rolled, 0);
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn each_year_is_rolled_once() {
        let config = CohortConfig::default();
        let mut c = cohort(BirthPath::Baseline, 4, 2);
        // Draws of 0.0 always kill: every member dies in year one.
        let mut rng = ScriptedSource::constant(0.0);
        let progress = advance(&mut c, 12, &config, &mut rng);
        assert_eq!(progress.deaths, vec![YearDeaths { year: 1, count: 4 }]);
        assert_eq!(c.dead, 4);
        assert_eq!(c.dead_females, 2);
        assert_eq!(c.last_year_rolled, 1);
        let again = advance(&mut c, 0, &config, &mut rng);
        assert!(again.deaths.is_empty());
    }

    #[test]
    fn watermark_never_passes_age() {
        let config = CohortConfig::default();
        let mut c = cohort(BirthPath::Deployed, 6, 3);
        let mut rng = SeededSource::new(7);
        for _ in 0..40 {
            let _ = advance(&mut c, 6, &config, &mut rng);
            assert!(c.dead <= c.size);
            assert!(c.last_year_rolled <= c.age_years());
        }
        assert_eq!(c.last_year_rolled, 16);
        assert!(c.deployed_out);
    }

    #[test]
    fn coming_of_age_deploys_all_daughters_off_outlander_path() {
        let config = CohortConfig::default();
        let mut c = cohort(BirthPath::Baseline, 5, 3);
        c.age_months = 15 * 12 + 6;
        c.last_year_rolled = 15;
        // Year 16 mortality spares everyone, then every deployment survives.
        let mut rng = ScriptedSource::constant(0.99);
        let progress = advance(&mut c, 6, &config, &mut rng);
        assert_eq!(
            progress.came_of_age,
            Some(ComingOfAge {
                deployed: 3,
                survived: 3
            })
        );
        assert_eq!(c.size, 2);
        assert_eq!(c.females, 0);
        assert!(c.deployed_out);
        assert!(c.dead <= c.size);
    }

    #[test]
    fn outlander_path_deploys_half() {
        let config = CohortConfig::default();
        let mut c = cohort(BirthPath::Outlander, 6, 5);
        c.age_months = 15 * 12 + 6;
        c.last_year_rolled = 15;
        let mut rng = ScriptedSource::constant(0.99);
        let progress = advance(&mut c, 6, &config, &mut rng);
        let outcome = progress.came_of_age.unwrap_or_default();
        assert_eq!(outcome.deployed, 2);
        assert_eq!(c.females, 3);
        assert_eq!(c.size, 4);
    }

    #[test]
    fn inert_cohort_only_ages() {
        let config = CohortConfig::default();
        let mut c = cohort(BirthPath::Baseline, 2, 1);
        c.dead = 2;
        c.dead_females = 1;
        let mut rng = ScriptedSource::constant(0.0);
        let progress = advance(&mut c, 24, &config, &mut rng);
        assert_eq!(progress, CohortProgress::default());
        assert_eq!(c.age_months, 24);
        assert_eq!(rng.consumed(), 0);
    }
}
