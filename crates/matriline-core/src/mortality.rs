//! Mortality resolution: ambient risk, the weighted cause pool, and the
//! per-action lethal chances.
//!
//! Everything here is a pure function of the subject, the session's modifier
//! stacks and the configuration. Drawing against these probabilities, and
//! the one-death-per-tick gate, belong to the tick pipeline.

use matriline_types::{DeathCause, SubjectState};

use crate::config::{EngineConfig, MortalityConfig};

/// Convert an annual probability into the probability over `years`.
///
/// `1 - (1 - annual)^years`, so two half-year ticks compound to the annual
/// rate.
pub fn rate_over(annual: f64, years: f64) -> f64 {
    let annual = annual.clamp(0.0, 1.0);
    1.0 - (1.0 - annual).powf(years)
}

/// Annual ambient risk before reductions, inflated beyond the lifespan cap.
pub fn annual_ambient_rate(subject: &SubjectState, config: &MortalityConfig) -> f64 {
    let years_over_cap = (subject.age - subject.lifespan_cap).max(0.0);
    (config.annual_civilian_rate + years_over_cap * config.over_cap_annual_rate_per_year)
        .clamp(0.0, 1.0)
}

/// Death probability for one ambient draw.
///
/// The half-year-scaled annual rate, multiplied by `(1 - reduction)` once per
/// modifier stack and once more for each personal advantage the subject
/// holds (proven, rat hunter).
pub fn ambient_probability(subject: &SubjectState, stacks: u32, config: &EngineConfig) -> f64 {
    let m = &config.mortality;
    let mut p = rate_over(annual_ambient_rate(subject, m), config.time.tick_years);
    p *= stack_multiplier(stacks, m.modifier_stack_reduction);
    if subject.proven {
        p *= 1.0 - m.proven_advantage;
    }
    if subject.rat_hunter {
        p *= 1.0 - m.rat_hunter_advantage;
    }
    p.clamp(0.0, 1.0)
}

/// `(1 - reduction)^stacks`.
pub fn stack_multiplier(stacks: u32, reduction: f64) -> f64 {
    let exponent = i32::try_from(stacks).unwrap_or(i32::MAX);
    (1.0 - reduction.clamp(0.0, 1.0)).powi(exponent)
}

// ---------------------------------------------------------------------------
// Cause pool
// ---------------------------------------------------------------------------

/// Weighted death causes for one ambient death.
///
/// Weights are relative and are not normalized: the draw is uniform over
/// their sum.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CausePool {
    entries: Vec<(DeathCause, f64)>,
}

impl CausePool {
    /// Assemble the pool for the subject's current situation.
    ///
    /// Universal causes always; husband conflict only with husbands, inflated
    /// by infamy; the never-deployed or the veteran extras depending on
    /// whether the subject has ever deployed; old age past the threshold.
    pub fn assemble(subject: &SubjectState, config: &MortalityConfig) -> Self {
        let w = &config.weights;
        let mut pool = Self::default();
        pool.push(DeathCause::Accident, w.accident);
        pool.push(DeathCause::Starvation, w.starvation);
        pool.push(DeathCause::RivalHouse, w.rival_house);

        if !subject.husbands.is_empty() {
            let inflation = f64::from(subject.infamy).mul_add(config.infamy_conflict_scale, 1.0);
            pool.push(DeathCause::HusbandQuarrel, w.husband_quarrel * inflation);
            pool.push(DeathCause::JealousHusband, w.jealous_husband * inflation);
        }

        if subject.deployed {
            pool.push(DeathCause::OldWounds, w.old_wounds);
            pool.push(DeathCause::Vendetta, w.vendetta);
            pool.push(DeathCause::Ambush, w.ambush);
        } else {
            pool.push(DeathCause::Fever, w.fever);
            pool.push(DeathCause::Childbed, w.childbed);
            pool.push(DeathCause::Raiders, w.raiders);
        }

        if subject.age >= config.old_age_threshold {
            pool.push(DeathCause::OldAge, w.old_age);
        }
        pool
    }

    fn push(&mut self, cause: DeathCause, weight: f64) {
        if weight.is_finite() && weight > 0.0 {
            self.entries.push((cause, weight));
        }
    }

    /// Causes with their weights, in pool order.
    pub fn entries(&self) -> &[(DeathCause, f64)] {
        &self.entries
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }

    /// Whether `cause` is in the pool.
    pub fn contains(&self, cause: DeathCause) -> bool {
        self.entries.iter().any(|(c, _)| *c == cause)
    }

    /// Pick a cause with one uniform draw `u` in `[0, 1)`.
    ///
    /// Walks the pool until the running sum passes `u * total`. An empty pool
    /// (every weight configured to zero) yields an accident.
    pub fn pick(&self, u: f64) -> DeathCause {
        let target = u.clamp(0.0, 1.0) * self.total();
        let mut running = 0.0;
        for (cause, weight) in &self.entries {
            running += weight;
            if target < running {
                return *cause;
            }
        }
        self.entries
            .last()
            .map_or(DeathCause::Accident, |(cause, _)| *cause)
    }
}

// ---------------------------------------------------------------------------
// Action risks
// ---------------------------------------------------------------------------

/// Death probability of the next deployment.
///
/// `base * (1 - min(prestige * scale, max_prestige)) * (1 - min(proven
/// daughters * per_daughter, max_daughter))`.
pub fn deployment_mortality(subject: &SubjectState, config: &EngineConfig) -> f64 {
    let d = &config.deployment;
    let base = if subject.deployments == 0 {
        d.first_mortality
    } else {
        d.repeat_mortality
    };
    let prestige_cut = (subject.prestige * d.prestige_reduction_scale).min(d.max_prestige_reduction);
    let daughter_cut = (f64::from(subject.daughters_proven) * d.per_proven_daughter_reduction)
        .min(d.max_daughter_reduction);
    (base * (1.0 - prestige_cut) * (1.0 - daughter_cut)).clamp(0.0, 1.0)
}

/// Smallest mortality any deployment can reach with full reductions.
pub fn deployment_mortality_floor(base: f64, config: &EngineConfig) -> f64 {
    let d = &config.deployment;
    base * (1.0 - d.max_prestige_reduction) * (1.0 - d.max_daughter_reduction)
}

/// Chance per tick that one husband kills another.
pub fn jealousy_chance(husbands: u32, config: &EngineConfig) -> f64 {
    let m = &config.marriage;
    let extra = f64::from(husbands.saturating_sub(1));
    (extra * m.jealousy_per_extra_husband).min(m.jealousy_cap)
}

/// Chance a deployed-track suitor flees from the subject's infamy.
///
/// Zero below the threshold, rising linearly to the configured maximum at
/// infamy 100.
pub fn fear_rejection_chance(infamy: u32, config: &EngineConfig) -> f64 {
    let m = &config.marriage;
    if infamy < m.fear_infamy_threshold {
        return 0.0;
    }
    let span = 100_u32.saturating_sub(m.fear_infamy_threshold);
    if span == 0 {
        return m.fear_max_rejection;
    }
    let over = infamy.min(100).saturating_sub(m.fear_infamy_threshold);
    m.fear_max_rejection * f64::from(over) / f64::from(span)
}

/// Duel win probability.
pub fn duel_win_chance(subject: &SubjectState, config: &EngineConfig) -> f64 {
    let d = &config.duel;
    let chance = f64::from(subject.infamy).mul_add(
        d.infamy_scale,
        f64::from(subject.duel_wins).mul_add(
            d.per_win,
            f64::from(subject.deployments).mul_add(d.per_deployment, d.base),
        ),
    );
    chance.clamp(0.0, d.cap)
}

/// Per-tick chance that a rat hunter is hunted down.
pub fn annihilation_chance(notoriety: u32, config: &EngineConfig) -> f64 {
    let h = &config.hunter;
    (f64::from(notoriety) * h.annihilation_per_notoriety).min(h.annihilation_cap)
}

#[cfg(test)]
mod tests {
    use matriline_types::HusbandRecord;

    use super::*;
    use crate::subject::fresh_subject;

    fn subject() -> SubjectState {
        fresh_subject(&EngineConfig::default(), 1)
    }

    #[test]
    fn two_ticks_compound_to_annual_rate() {
        let half = rate_over(0.02, 0.5);
        let annual = 1.0 - (1.0 - half) * (1.0 - half);
        assert!((annual - 0.02).abs() < 1e-12);
    }

    #[test]
    fn ambient_risk_inflates_past_cap() {
        let config = EngineConfig::default();
        let young = subject();
        let mut old = subject();
        old.age = 60.0;
        let p_young = ambient_probability(&young, 0, &config);
        let p_old = ambient_probability(&old, 0, &config);
        assert!(p_old > p_young);
        let annual = annual_ambient_rate(&old, &config.mortality);
        assert!((annual - (0.02 + 10.0 * 0.015)).abs() < 1e-12);
    }

    #[test]
    fn stacks_and_advantages_reduce_risk() {
        let config = EngineConfig::default();
        let s = subject();
        let base = ambient_probability(&s, 0, &config);
        let stacked = ambient_probability(&s, 2, &config);
        assert!((stacked - base * 0.95 * 0.95).abs() < 1e-12);

        let mut proven = subject();
        proven.proven = true;
        let p = ambient_probability(&proven, 0, &config);
        assert!((p - base * 0.85).abs() < 1e-12);
    }

    #[test]
    fn pool_depends_on_situation() {
        let config = EngineConfig::default();
        let s = subject();
        let pool = CausePool::assemble(&s, &config.mortality);
        assert!(pool.contains(DeathCause::Fever));
        assert!(!pool.contains(DeathCause::OldWounds));
        assert!(!pool.contains(DeathCause::HusbandQuarrel));
        assert!(!pool.contains(DeathCause::OldAge));

        let mut vet = subject();
        vet.deployed = true;
        vet.age = 85.0;
        vet.husbands.push(HusbandRecord { taken_at_age: 20.0 });
        let pool = CausePool::assemble(&vet, &config.mortality);
        assert!(pool.contains(DeathCause::OldWounds));
        assert!(!pool.contains(DeathCause::Fever));
        assert!(pool.contains(DeathCause::HusbandQuarrel));
        assert!(pool.contains(DeathCause::OldAge));
    }

    #[test]
    fn infamy_inflates_husband_conflict() {
        let config = EngineConfig::default();
        let mut s = subject();
        s.husbands.push(HusbandRecord { taken_at_age: 16.0 });
        s.infamy = 50;
        let pool = CausePool::assemble(&s, &config.mortality);
        let quarrel = pool
            .entries()
            .iter()
            .find(|(c, _)| *c == DeathCause::HusbandQuarrel)
            .map_or(0.0, |(_, w)| *w);
        assert!((quarrel - 0.5 * 2.0).abs() < 1e-12);
    }

    #[test]
    fn pick_walks_relative_weights() {
        let config = EngineConfig::default();
        let pool = CausePool::assemble(&subject(), &config.mortality);
        // accident 1.0, starvation 0.6, rival 0.8, fever 1.2, childbed 0.8, raiders 0.6 = 5.0
        assert!((pool.total() - 5.0).abs() < 1e-12);
        assert_eq!(pool.pick(0.0), DeathCause::Accident);
        assert_eq!(pool.pick(0.19), DeathCause::Accident);
        assert_eq!(pool.pick(0.21), DeathCause::Starvation);
        assert_eq!(pool.pick(0.999), DeathCause::Raiders);
        assert_eq!(CausePool::default().pick(0.5), DeathCause::Accident);
    }

    #[test]
    fn deployment_reductions_are_bounded() {
        let config = EngineConfig::default();
        let mut s = subject();
        assert!((deployment_mortality(&s, &config) - 0.5).abs() < 1e-12);
        s.prestige = 1.0;
        s.daughters_proven = 500;
        let p = deployment_mortality(&s, &config);
        let floor = deployment_mortality_floor(0.5, &config);
        assert!((p - floor).abs() < 1e-12);
        assert!((floor - 0.5 * 0.7 * 0.5).abs() < 1e-12);
        s.deployments = 1;
        assert!(deployment_mortality(&s, &config) < p);
    }

    #[test]
    fn jealousy_scales_and_caps() {
        let config = EngineConfig::default();
        assert!(jealousy_chance(1, &config).abs() < f64::EPSILON);
        assert!((jealousy_chance(3, &config) - 0.04).abs() < 1e-12);
        assert!((jealousy_chance(100, &config) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn fear_starts_at_threshold() {
        let config = EngineConfig::default();
        assert!(fear_rejection_chance(59, &config).abs() < f64::EPSILON);
        assert!(fear_rejection_chance(60, &config).abs() < f64::EPSILON);
        assert!((fear_rejection_chance(80, &config) - 0.15).abs() < 1e-12);
        assert!((fear_rejection_chance(100, &config) - 0.30).abs() < 1e-12);
    }

    #[test]
    fn duel_chance_is_clamped() {
        let config = EngineConfig::default();
        let mut s = subject();
        s.deployments = 1;
        assert!((duel_win_chance(&s, &config) - 0.45).abs() < 1e-12);
        s.infamy = 100;
        s.duel_wins = 20;
        assert!((duel_win_chance(&s, &config) - 0.95).abs() < 1e-12);
    }

    #[test]
    fn annihilation_caps() {
        let config = EngineConfig::default();
        assert!((annihilation_chance(10, &config) - 0.02).abs() < 1e-12);
        assert!((annihilation_chance(1_000, &config) - 0.20).abs() < 1e-12);
    }
}
