//! Subject construction and small derived-value helpers.

use matriline_types::{
    CohortId, FactionKind, FactionState, GalaStage, SubjectId, SubjectState,
};

use crate::config::EngineConfig;

/// Highest infamy a subject can hold.
pub const MAX_INFAMY: u32 = 100;

/// A fresh subject at the configured starting age with default flags.
pub fn fresh_subject(config: &EngineConfig, life_number: u32) -> SubjectState {
    SubjectState {
        id: SubjectId::new(),
        life_number,
        age: config.time.start_age,
        alive: true,
        cause_of_death: None,
        lifespan_cap: config.time.base_lifespan_cap,
        proven: false,
        deployments: 0,
        deployed: false,
        outlander: false,
        rat_hunter: false,
        league_active: false,
        husbands: Vec::new(),
        husbands_taken: 0,
        infamy: 0,
        prestige: 0.0,
        daughters_total: 0,
        daughters_proven: 0,
        prestige_milestones: 0,
        duel_wins: 0,
        hunter_notoriety: 0,
        gala_stage: GalaStage::None,
        gala_outcome: None,
        cohorts: Vec::new(),
        next_cohort_id: CohortId(0),
        union: FactionState::new(FactionKind::Union),
        league: FactionState::new(FactionKind::League),
    }
}

/// Raise infamy, clamped to [`MAX_INFAMY`].
pub fn add_infamy(subject: &mut SubjectState, gain: u32) {
    subject.infamy = subject.infamy.saturating_add(gain).min(MAX_INFAMY);
}

/// Prestige milestone crossed by a recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrestigeMilestone {
    /// Prestige first reached one half.
    Half,
    /// Prestige first reached one.
    Full,
}

/// Recompute prestige from the daughter counts and report any milestones
/// crossed for the first time, in ascending order.
pub fn recompute_prestige(subject: &mut SubjectState) -> Vec<PrestigeMilestone> {
    subject.prestige = if subject.daughters_total == 0 {
        0.0
    } else {
        (f64::from(subject.daughters_proven) / f64::from(subject.daughters_total)).clamp(0.0, 1.0)
    };

    let mut crossed = Vec::new();
    if subject.prestige >= 0.5 && subject.prestige_milestones < 1 {
        subject.prestige_milestones = 1;
        crossed.push(PrestigeMilestone::Half);
    }
    if subject.prestige >= 1.0 && subject.prestige_milestones < 2 {
        subject.prestige_milestones = 2;
        crossed.push(PrestigeMilestone::Full);
    }
    crossed
}
