//! Configuration loading and typed config structures.
//!
//! Every tunable of the engine lives in [`EngineConfig`]. The YAML file may
//! name any subset of keys: missing sections and fields take the defaults
//! below. After parsing, [`EngineConfig::sanitized`] replaces non-finite or
//! out-of-range values with their defaults, so formulas downstream only ever
//! see validated numbers.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tick size, starting age, lifespan cap.
    pub time: TimeConfig,
    /// Ambient civilian mortality and the cause pool.
    pub mortality: MortalityConfig,
    /// Courtship and husband attrition.
    pub marriage: MarriageConfig,
    /// Litter size and juvenile survival.
    pub reproduction: ReproductionConfig,
    /// Deployment mortality and rewards.
    pub deployment: DeploymentConfig,
    /// Child mortality curves and coming of age.
    pub cohort: CohortConfig,
    /// Shared faction mechanics (union and league).
    pub faction: FactionConfig,
    /// Rat-hunter economy.
    pub hunter: HunterConfig,
    /// Duels.
    pub duel: DuelConfig,
    /// Gala event flow.
    pub gala: GalaConfig,
    /// Logging output.
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load configuration from a YAML file and sanitize it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string and sanitize it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config.sanitized())
    }

    /// Replace every invalid value with its documented default.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.time.sanitize();
        self.mortality.sanitize();
        self.marriage.sanitize();
        self.reproduction.sanitize();
        self.deployment.sanitize();
        self.cohort.sanitize();
        self.faction.sanitize();
        self.hunter.sanitize();
        self.duel.sanitize();
        self.gala.sanitize();
        self
    }
}

// ---------------------------------------------------------------------------
// Sanitizing helpers
// ---------------------------------------------------------------------------

fn replace(field: &'static str, value: &mut f64, default: f64) {
    warn!(field, value = *value, default, "invalid configuration value, using default");
    *value = default;
}

/// A probability must be finite and within [0, 1].
fn probability(field: &'static str, value: &mut f64, default: f64) {
    if !value.is_finite() || !(0.0..=1.0).contains(value) {
        replace(field, value, default);
    }
}

/// Finite and not negative.
fn non_negative(field: &'static str, value: &mut f64, default: f64) {
    if !value.is_finite() || *value < 0.0 {
        replace(field, value, default);
    }
}

/// Finite and strictly positive.
fn positive(field: &'static str, value: &mut f64, default: f64) {
    if !value.is_finite() || *value <= 0.0 {
        replace(field, value, default);
    }
}

fn ordered_range(field: &'static str, min: &mut u32, max: &mut u32, defaults: (u32, u32)) {
    if *min > *max {
        warn!(field, min = *min, max = *max, "inverted range, using defaults");
        *min = defaults.0;
        *max = defaults.1;
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Tick size and lifespan settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Years per tick (default: 0.5).
    pub tick_years: f64,
    /// Age of a fresh subject (default: 16.0).
    pub start_age: f64,
    /// Age beyond which ambient risk inflates (default: 50.0).
    pub base_lifespan_cap: f64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            tick_years: 0.5,
            start_age: 16.0,
            base_lifespan_cap: 50.0,
        }
    }
}

impl TimeConfig {
    fn sanitize(&mut self) {
        let d = Self::default();
        positive("time.tick_years", &mut self.tick_years, d.tick_years);
        non_negative("time.start_age", &mut self.start_age, d.start_age);
        positive("time.base_lifespan_cap", &mut self.base_lifespan_cap, d.base_lifespan_cap);
    }

    /// Number of ticks covering `years`, at least one.
    pub fn ticks_for(&self, years: f64) -> u32 {
        let ticks = (years / self.tick_years).round();
        if ticks.is_finite() && ticks >= 1.0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let whole = ticks.min(f64::from(u32::MAX)) as u32;
            whole
        } else {
            1
        }
    }

    /// Months added to a cohort's age per tick.
    pub fn months_per_tick(&self) -> u32 {
        let months = (self.tick_years * 12.0).round();
        if months >= 1.0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let whole = months.min(f64::from(u32::MAX)) as u32;
            whole
        } else {
            1
        }
    }
}

// ---------------------------------------------------------------------------
// Mortality
// ---------------------------------------------------------------------------

/// Relative weights of the ambient death causes.
///
/// Weights are relative: the cause is drawn uniformly over their sum.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CauseWeights {
    /// Universal.
    pub accident: f64,
    /// Universal.
    pub starvation: f64,
    /// Universal.
    pub rival_house: f64,
    /// Only with husbands; inflated by infamy.
    pub husband_quarrel: f64,
    /// Only with husbands; inflated by infamy.
    pub jealous_husband: f64,
    /// Never-deployed pool.
    pub fever: f64,
    /// Never-deployed pool.
    pub childbed: f64,
    /// Never-deployed pool.
    pub raiders: f64,
    /// Veteran pool.
    pub old_wounds: f64,
    /// Veteran pool.
    pub vendetta: f64,
    /// Veteran pool.
    pub ambush: f64,
    /// Only at or beyond the old-age threshold.
    pub old_age: f64,
}

impl Default for CauseWeights {
    fn default() -> Self {
        Self {
            accident: 1.0,
            starvation: 0.6,
            rival_house: 0.8,
            husband_quarrel: 0.5,
            jealous_husband: 0.3,
            fever: 1.2,
            childbed: 0.8,
            raiders: 0.6,
            old_wounds: 1.0,
            vendetta: 0.7,
            ambush: 0.5,
            old_age: 4.0,
        }
    }
}

impl CauseWeights {
    fn sanitize(&mut self) {
        let d = Self::default();
        non_negative("mortality.weights.accident", &mut self.accident, d.accident);
        non_negative("mortality.weights.starvation", &mut self.starvation, d.starvation);
        non_negative("mortality.weights.rival_house", &mut self.rival_house, d.rival_house);
        non_negative(
            "mortality.weights.husband_quarrel",
            &mut self.husband_quarrel,
            d.husband_quarrel,
        );
        non_negative(
            "mortality.weights.jealous_husband",
            &mut self.jealous_husband,
            d.jealous_husband,
        );
        non_negative("mortality.weights.fever", &mut self.fever, d.fever);
        non_negative("mortality.weights.childbed", &mut self.childbed, d.childbed);
        non_negative("mortality.weights.raiders", &mut self.raiders, d.raiders);
        non_negative("mortality.weights.old_wounds", &mut self.old_wounds, d.old_wounds);
        non_negative("mortality.weights.vendetta", &mut self.vendetta, d.vendetta);
        non_negative("mortality.weights.ambush", &mut self.ambush, d.ambush);
        non_negative("mortality.weights.old_age", &mut self.old_age, d.old_age);
    }
}

/// Ambient civilian mortality.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MortalityConfig {
    /// Annual death probability before any modifier (default: 0.02).
    pub annual_civilian_rate: f64,
    /// Extra annual risk per year beyond the lifespan cap (default: 0.015).
    pub over_cap_annual_rate_per_year: f64,
    /// Fraction of residual risk removed per modifier stack (default: 0.05).
    pub modifier_stack_reduction: f64,
    /// Fraction of risk removed for a proven subject (default: 0.15).
    pub proven_advantage: f64,
    /// Fraction of risk removed for a rat hunter (default: 0.25).
    pub rat_hunter_advantage: f64,
    /// Age at which old age joins the cause pool (default: 80.0).
    pub old_age_threshold: f64,
    /// Husband-conflict weights are multiplied by `1 + infamy * scale` (default: 0.02).
    pub infamy_conflict_scale: f64,
    /// Cause weights.
    pub weights: CauseWeights,
}

impl Default for MortalityConfig {
    fn default() -> Self {
        Self {
            annual_civilian_rate: 0.02,
            over_cap_annual_rate_per_year: 0.015,
            modifier_stack_reduction: 0.05,
            proven_advantage: 0.15,
            rat_hunter_advantage: 0.25,
            old_age_threshold: 80.0,
            infamy_conflict_scale: 0.02,
            weights: CauseWeights::default(),
        }
    }
}

impl MortalityConfig {
    fn sanitize(&mut self) {
        let d = Self::default();
        probability(
            "mortality.annual_civilian_rate",
            &mut self.annual_civilian_rate,
            d.annual_civilian_rate,
        );
        probability(
            "mortality.over_cap_annual_rate_per_year",
            &mut self.over_cap_annual_rate_per_year,
            d.over_cap_annual_rate_per_year,
        );
        probability(
            "mortality.modifier_stack_reduction",
            &mut self.modifier_stack_reduction,
            d.modifier_stack_reduction,
        );
        probability("mortality.proven_advantage", &mut self.proven_advantage, d.proven_advantage);
        probability(
            "mortality.rat_hunter_advantage",
            &mut self.rat_hunter_advantage,
            d.rat_hunter_advantage,
        );
        non_negative(
            "mortality.old_age_threshold",
            &mut self.old_age_threshold,
            d.old_age_threshold,
        );
        non_negative(
            "mortality.infamy_conflict_scale",
            &mut self.infamy_conflict_scale,
            d.infamy_conflict_scale,
        );
        self.weights.sanitize();
    }
}

// ---------------------------------------------------------------------------
// Marriage
// ---------------------------------------------------------------------------

/// Courtship odds and husband attrition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MarriageConfig {
    /// Years a union lasts before the husband leaves (default: 20.0).
    pub union_duration_years: f64,
    /// Jealous-kill chance per husband beyond the first, per tick (default: 0.02).
    pub jealousy_per_extra_husband: f64,
    /// Upper bound on the jealous-kill chance (default: 0.5).
    pub jealousy_cap: f64,
    /// Acceptance on the baseline track (default: 0.30).
    pub baseline_acceptance: f64,
    /// Acceptance on the outlander track (default: 0.20).
    pub outlander_acceptance: f64,
    /// Acceptance on the deployed track (default: 0.85).
    pub deployed_acceptance: f64,
    /// Infamy at which suitors start to flee (default: 60).
    pub fear_infamy_threshold: u32,
    /// Fear rejection chance at infamy 100 (default: 0.30).
    pub fear_max_rejection: f64,
    /// Lethal chance when a baseline or outlander suitor declines (default: 0.02).
    pub suitor_house_lethal: f64,
}

impl Default for MarriageConfig {
    fn default() -> Self {
        Self {
            union_duration_years: 20.0,
            jealousy_per_extra_husband: 0.02,
            jealousy_cap: 0.5,
            baseline_acceptance: 0.30,
            outlander_acceptance: 0.20,
            deployed_acceptance: 0.85,
            fear_infamy_threshold: 60,
            fear_max_rejection: 0.30,
            suitor_house_lethal: 0.02,
        }
    }
}

impl MarriageConfig {
    fn sanitize(&mut self) {
        let d = Self::default();
        positive(
            "marriage.union_duration_years",
            &mut self.union_duration_years,
            d.union_duration_years,
        );
        probability(
            "marriage.jealousy_per_extra_husband",
            &mut self.jealousy_per_extra_husband,
            d.jealousy_per_extra_husband,
        );
        probability("marriage.jealousy_cap", &mut self.jealousy_cap, d.jealousy_cap);
        probability(
            "marriage.baseline_acceptance",
            &mut self.baseline_acceptance,
            d.baseline_acceptance,
        );
        probability(
            "marriage.outlander_acceptance",
            &mut self.outlander_acceptance,
            d.outlander_acceptance,
        );
        probability(
            "marriage.deployed_acceptance",
            &mut self.deployed_acceptance,
            d.deployed_acceptance,
        );
        if self.fear_infamy_threshold > 100 {
            warn!(
                field = "marriage.fear_infamy_threshold",
                value = self.fear_infamy_threshold,
                "invalid configuration value, using default"
            );
            self.fear_infamy_threshold = d.fear_infamy_threshold;
        }
        probability(
            "marriage.fear_max_rejection",
            &mut self.fear_max_rejection,
            d.fear_max_rejection,
        );
        probability(
            "marriage.suitor_house_lethal",
            &mut self.suitor_house_lethal,
            d.suitor_house_lethal,
        );
    }
}

// ---------------------------------------------------------------------------
// Reproduction
// ---------------------------------------------------------------------------

/// Litter size and juvenile survival.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReproductionConfig {
    /// Smallest litter (default: 1).
    pub litter_min: u32,
    /// Largest litter (default: 6).
    pub litter_max: u32,
    /// Chance each newborn is female (default: 0.5).
    pub female_ratio: f64,
    /// Infant survival with a single husband (default: 0.60).
    pub base_juvenile_survival: f64,
    /// Share of the remaining infant risk removed per extra husband (default: 0.10).
    pub extra_husband_bonus: f64,
    /// Ceiling on infant survival (default: 0.95).
    pub juvenile_survival_cap: f64,
}

impl Default for ReproductionConfig {
    fn default() -> Self {
        Self {
            litter_min: 1,
            litter_max: 6,
            female_ratio: 0.5,
            base_juvenile_survival: 0.60,
            extra_husband_bonus: 0.10,
            juvenile_survival_cap: 0.95,
        }
    }
}

impl ReproductionConfig {
    fn sanitize(&mut self) {
        let d = Self::default();
        ordered_range(
            "reproduction.litter",
            &mut self.litter_min,
            &mut self.litter_max,
            (d.litter_min, d.litter_max),
        );
        probability("reproduction.female_ratio", &mut self.female_ratio, d.female_ratio);
        probability(
            "reproduction.base_juvenile_survival",
            &mut self.base_juvenile_survival,
            d.base_juvenile_survival,
        );
        probability(
            "reproduction.extra_husband_bonus",
            &mut self.extra_husband_bonus,
            d.extra_husband_bonus,
        );
        probability(
            "reproduction.juvenile_survival_cap",
            &mut self.juvenile_survival_cap,
            d.juvenile_survival_cap,
        );
    }
}

// ---------------------------------------------------------------------------
// Deployment
// ---------------------------------------------------------------------------

/// Deployment mortality, reductions and rewards.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    /// Mortality of the first deployment (default: 0.50).
    pub first_mortality: f64,
    /// Mortality of every later deployment (default: 0.10).
    pub repeat_mortality: f64,
    /// Reduction per unit of prestige (default: 0.30).
    pub prestige_reduction_scale: f64,
    /// Ceiling on the prestige reduction (default: 0.30).
    pub max_prestige_reduction: f64,
    /// Reduction per proven daughter (default: 0.01).
    pub per_proven_daughter_reduction: f64,
    /// Ceiling on the proven-daughter reduction (default: 0.50).
    pub max_daughter_reduction: f64,
    /// Infamy gained per survived deployment (default: 10).
    pub infamy_gain: u32,
    /// Years added to the lifespan cap per survived deployment (default: 5.0).
    pub lifespan_extension_years: f64,
    /// Length of a deployment in years (default: 2.0).
    pub block_years: f64,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            first_mortality: 0.50,
            repeat_mortality: 0.10,
            prestige_reduction_scale: 0.30,
            max_prestige_reduction: 0.30,
            per_proven_daughter_reduction: 0.01,
            max_daughter_reduction: 0.50,
            infamy_gain: 10,
            lifespan_extension_years: 5.0,
            block_years: 2.0,
        }
    }
}

impl DeploymentConfig {
    fn sanitize(&mut self) {
        let d = Self::default();
        probability("deployment.first_mortality", &mut self.first_mortality, d.first_mortality);
        probability("deployment.repeat_mortality", &mut self.repeat_mortality, d.repeat_mortality);
        non_negative(
            "deployment.prestige_reduction_scale",
            &mut self.prestige_reduction_scale,
            d.prestige_reduction_scale,
        );
        probability(
            "deployment.max_prestige_reduction",
            &mut self.max_prestige_reduction,
            d.max_prestige_reduction,
        );
        probability(
            "deployment.per_proven_daughter_reduction",
            &mut self.per_proven_daughter_reduction,
            d.per_proven_daughter_reduction,
        );
        probability(
            "deployment.max_daughter_reduction",
            &mut self.max_daughter_reduction,
            d.max_daughter_reduction,
        );
        non_negative(
            "deployment.lifespan_extension_years",
            &mut self.lifespan_extension_years,
            d.lifespan_extension_years,
        );
        positive("deployment.block_years", &mut self.block_years, d.block_years);
    }
}

// ---------------------------------------------------------------------------
// Cohorts
// ---------------------------------------------------------------------------

/// Child mortality curves and coming of age.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CohortConfig {
    /// Cumulative mortality to coming of age, baseline path (default: 0.30).
    pub baseline_cumulative_mortality: f64,
    /// Cumulative mortality to coming of age, outlander path (default: 0.50).
    pub outlander_cumulative_mortality: f64,
    /// Cumulative mortality to coming of age, deployed path (default: 0.20).
    pub deployed_cumulative_mortality: f64,
    /// Cumulative mortality to coming of age, rat-hunter path (default: 0.10).
    pub rat_hunter_cumulative_mortality: f64,
    /// Year at which daughters deploy out (default: 16).
    pub coming_of_age_years: u32,
    /// Share of surviving outlander daughters that deploy (default: 0.5).
    pub outlander_deploy_fraction: f64,
    /// Mortality of deploying outlander daughters (default: 0.60).
    pub outlander_deploy_mortality: f64,
    /// Mortality of deploying daughters on every other path (default: 0.40).
    pub standard_deploy_mortality: f64,
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            baseline_cumulative_mortality: 0.30,
            outlander_cumulative_mortality: 0.50,
            deployed_cumulative_mortality: 0.20,
            rat_hunter_cumulative_mortality: 0.10,
            coming_of_age_years: 16,
            outlander_deploy_fraction: 0.5,
            outlander_deploy_mortality: 0.60,
            standard_deploy_mortality: 0.40,
        }
    }
}

impl CohortConfig {
    fn sanitize(&mut self) {
        let d = Self::default();
        probability(
            "cohort.baseline_cumulative_mortality",
            &mut self.baseline_cumulative_mortality,
            d.baseline_cumulative_mortality,
        );
        probability(
            "cohort.outlander_cumulative_mortality",
            &mut self.outlander_cumulative_mortality,
            d.outlander_cumulative_mortality,
        );
        probability(
            "cohort.deployed_cumulative_mortality",
            &mut self.deployed_cumulative_mortality,
            d.deployed_cumulative_mortality,
        );
        probability(
            "cohort.rat_hunter_cumulative_mortality",
            &mut self.rat_hunter_cumulative_mortality,
            d.rat_hunter_cumulative_mortality,
        );
        if self.coming_of_age_years == 0 {
            warn!(
                field = "cohort.coming_of_age_years",
                "invalid configuration value, using default"
            );
            self.coming_of_age_years = d.coming_of_age_years;
        }
        probability(
            "cohort.outlander_deploy_fraction",
            &mut self.outlander_deploy_fraction,
            d.outlander_deploy_fraction,
        );
        probability(
            "cohort.outlander_deploy_mortality",
            &mut self.outlander_deploy_mortality,
            d.outlander_deploy_mortality,
        );
        probability(
            "cohort.standard_deploy_mortality",
            &mut self.standard_deploy_mortality,
            d.standard_deploy_mortality,
        );
    }
}

// ---------------------------------------------------------------------------
// Factions
// ---------------------------------------------------------------------------

/// Mechanics shared by the union and the league.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FactionConfig {
    /// Membership ceiling (default: 10 000).
    pub capacity: u32,
    /// Members at founding (default: 10).
    pub founding_members: u32,
    /// Members each cache saves through a purge (default: 50).
    pub per_cache_quota: u32,
    /// Smallest recruitment drive (default: 20).
    pub expand_min: u32,
    /// Largest recruitment drive (default: 120).
    pub expand_max: u32,
    /// Lethal chance of founding (default: 0.01).
    pub found_lethal: f64,
    /// Lethal chance of a recruitment drive (default: 0.02).
    pub expand_lethal: f64,
    /// Lethal chance of building a cache (default: 0.01).
    pub cache_lethal: f64,
    /// Lethal chance of a sabotage or hunt (default: 0.05).
    pub strike_lethal: f64,
    /// Infamy gained by a sabotage or hunt (default: 5).
    pub strike_infamy_gain: u32,
    /// Members drawn in by a sabotage or hunt (default: 25).
    pub strike_recruits: u32,
    /// Membership that unlocks the revolt or purge (default: 1 000).
    pub uprising_threshold: u32,
    /// Uprising success at the unlock threshold (default: 0.10).
    pub uprising_base: f64,
    /// Uprising success at capacity (default: 0.95).
    pub uprising_ceiling: f64,
    /// Success added per modifier stack (default: 0.02).
    pub uprising_stack_bonus: f64,
    /// Ceiling on uprising success after bonuses (default: 0.99).
    pub uprising_max: f64,
    /// Infamy gained by a successful uprising (default: 15).
    pub uprising_infamy_gain: u32,
    /// Length of a hiding period in years (default: 3.0).
    pub hiding_years: f64,
    /// Lethal chance of being uncovered during a hiding period (default: 0.10).
    pub uncovered_lethal: f64,
    /// Stealth failure chance per half year, flat part (default: 0.005).
    pub stealth_failure_base: f64,
    /// Stealth failure chance per half year, per member (default: 0.000 002).
    pub stealth_failure_per_member: f64,
    /// Most per-member churn trials run in one tick (default: 400).
    pub churn_trial_cap: u32,
    /// Per-member chance of violent removal per tick (default: 0.010).
    pub removal_rate: f64,
    /// Per-member chance of bringing in a recruit per tick (default: 0.030).
    pub recruit_rate: f64,
}

impl Default for FactionConfig {
    fn default() -> Self {
        Self {
            capacity: MAX_FACTION_CAPACITY,
            founding_members: 10,
            per_cache_quota: 50,
            expand_min: 20,
            expand_max: 120,
            found_lethal: 0.01,
            expand_lethal: 0.02,
            cache_lethal: 0.01,
            strike_lethal: 0.05,
            strike_infamy_gain: 5,
            strike_recruits: 25,
            uprising_threshold: 1_000,
            uprising_base: 0.10,
            uprising_ceiling: 0.95,
            uprising_stack_bonus: 0.02,
            uprising_max: 0.99,
            uprising_infamy_gain: 15,
            hiding_years: 3.0,
            uncovered_lethal: 0.10,
            stealth_failure_base: 0.005,
            stealth_failure_per_member: 0.000_002,
            churn_trial_cap: 400,
            removal_rate: 0.010,
            recruit_rate: 0.030,
        }
    }
}

/// Hard ceiling on faction membership; a configured capacity above it is
/// rejected.
pub const MAX_FACTION_CAPACITY: u32 = 10_000;

impl FactionConfig {
    fn sanitize(&mut self) {
        let d = Self::default();
        if self.capacity == 0 || self.capacity > MAX_FACTION_CAPACITY {
            warn!(
                field = "faction.capacity",
                value = self.capacity,
                "invalid configuration value, using default"
            );
            self.capacity = d.capacity;
        }
        if self.uprising_threshold == 0 || self.uprising_threshold > self.capacity {
            warn!(
                field = "faction.uprising_threshold",
                value = self.uprising_threshold,
                "invalid configuration value, using default"
            );
            self.uprising_threshold = d.uprising_threshold.min(self.capacity);
        }
        ordered_range(
            "faction.expand",
            &mut self.expand_min,
            &mut self.expand_max,
            (d.expand_min, d.expand_max),
        );
        probability("faction.found_lethal", &mut self.found_lethal, d.found_lethal);
        probability("faction.expand_lethal", &mut self.expand_lethal, d.expand_lethal);
        probability("faction.cache_lethal", &mut self.cache_lethal, d.cache_lethal);
        probability("faction.strike_lethal", &mut self.strike_lethal, d.strike_lethal);
        probability("faction.uprising_base", &mut self.uprising_base, d.uprising_base);
        probability("faction.uprising_ceiling", &mut self.uprising_ceiling, d.uprising_ceiling);
        if self.uprising_ceiling < self.uprising_base {
            warn!(
                field = "faction.uprising_ceiling",
                "ceiling below base, using defaults"
            );
            self.uprising_base = d.uprising_base;
            self.uprising_ceiling = d.uprising_ceiling;
        }
        probability(
            "faction.uprising_stack_bonus",
            &mut self.uprising_stack_bonus,
            d.uprising_stack_bonus,
        );
        probability("faction.uprising_max", &mut self.uprising_max, d.uprising_max);
        positive("faction.hiding_years", &mut self.hiding_years, d.hiding_years);
        probability("faction.uncovered_lethal", &mut self.uncovered_lethal, d.uncovered_lethal);
        probability(
            "faction.stealth_failure_base",
            &mut self.stealth_failure_base,
            d.stealth_failure_base,
        );
        probability(
            "faction.stealth_failure_per_member",
            &mut self.stealth_failure_per_member,
            d.stealth_failure_per_member,
        );
        if self.churn_trial_cap == 0 {
            warn!(field = "faction.churn_trial_cap", "invalid configuration value, using default");
            self.churn_trial_cap = d.churn_trial_cap;
        }
        probability("faction.removal_rate", &mut self.removal_rate, d.removal_rate);
        probability("faction.recruit_rate", &mut self.recruit_rate, d.recruit_rate);
    }
}

// ---------------------------------------------------------------------------
// Hunter economy
// ---------------------------------------------------------------------------

/// Rat-hunter economy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HunterConfig {
    /// Infamy gained per safari (default: 3).
    pub safari_infamy: u32,
    /// Lethal chance of a safari (default: 0.03).
    pub safari_lethal: f64,
    /// Infamy gained per blood sport (default: 6).
    pub blood_sport_infamy: u32,
    /// Lethal chance of the blood sports (default: 0.06).
    pub blood_sport_lethal: f64,
    /// Notoriety gained per safari (default: 1).
    pub notoriety_per_safari: u32,
    /// Notoriety gained per blood sport (default: 2).
    pub notoriety_per_blood_sport: u32,
    /// Per-tick annihilation chance per notoriety point (default: 0.002).
    pub annihilation_per_notoriety: f64,
    /// Ceiling on the per-tick annihilation chance (default: 0.20).
    pub annihilation_cap: f64,
}

impl Default for HunterConfig {
    fn default() -> Self {
        Self {
            safari_infamy: 3,
            safari_lethal: 0.03,
            blood_sport_infamy: 6,
            blood_sport_lethal: 0.06,
            notoriety_per_safari: 1,
            notoriety_per_blood_sport: 2,
            annihilation_per_notoriety: 0.002,
            annihilation_cap: 0.20,
        }
    }
}

impl HunterConfig {
    fn sanitize(&mut self) {
        let d = Self::default();
        probability("hunter.safari_lethal", &mut self.safari_lethal, d.safari_lethal);
        probability(
            "hunter.blood_sport_lethal",
            &mut self.blood_sport_lethal,
            d.blood_sport_lethal,
        );
        probability(
            "hunter.annihilation_per_notoriety",
            &mut self.annihilation_per_notoriety,
            d.annihilation_per_notoriety,
        );
        probability("hunter.annihilation_cap", &mut self.annihilation_cap, d.annihilation_cap);
    }
}

// ---------------------------------------------------------------------------
// Duels
// ---------------------------------------------------------------------------

/// Duel odds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DuelConfig {
    /// Base win chance (default: 0.40).
    pub base: f64,
    /// Added per deployment survived (default: 0.05).
    pub per_deployment: f64,
    /// Added per duel already won (default: 0.05).
    pub per_win: f64,
    /// Added per infamy point (default: 0.002).
    pub infamy_scale: f64,
    /// Ceiling on the win chance (default: 0.95).
    pub cap: f64,
    /// Infamy gained per win (default: 5).
    pub infamy_gain: u32,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            base: 0.40,
            per_deployment: 0.05,
            per_win: 0.05,
            infamy_scale: 0.002,
            cap: 0.95,
            infamy_gain: 5,
        }
    }
}

impl DuelConfig {
    fn sanitize(&mut self) {
        let d = Self::default();
        probability("duel.base", &mut self.base, d.base);
        probability("duel.per_deployment", &mut self.per_deployment, d.per_deployment);
        probability("duel.per_win", &mut self.per_win, d.per_win);
        probability("duel.infamy_scale", &mut self.infamy_scale, d.infamy_scale);
        probability("duel.cap", &mut self.cap, d.cap);
    }
}

// ---------------------------------------------------------------------------
// Gala
// ---------------------------------------------------------------------------

/// Gala event flow.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GalaConfig {
    /// Chance an investigation finds leverage (default: 0.5).
    pub investigate_you_chance: f64,
}

impl Default for GalaConfig {
    fn default() -> Self {
        Self {
            investigate_you_chance: 0.5,
        }
    }
}

impl GalaConfig {
    fn sanitize(&mut self) {
        let d = Self::default();
        probability(
            "gala.investigate_you_chance",
            &mut self.investigate_you_chance,
            d.investigate_you_chance,
        );
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Logging output settings, read by the CLI when installing the subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset (default: "info").
    pub level: String,
    /// Emit JSON lines instead of human-readable output (default: false).
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}
