//! State structs: the subject, its cohorts and factions, and the archived
//! summary of a finished life.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{BirthPath, DeathCause, FactionKind, GalaOutcome, GalaStage, Track};
use crate::events::Notification;
use crate::ids::{CohortId, SubjectId};

// ---------------------------------------------------------------------------
// Husbands
// ---------------------------------------------------------------------------

/// One current husband.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HusbandRecord {
    /// Subject age when this husband was taken.
    pub taken_at_age: f64,
}

// ---------------------------------------------------------------------------
// Cohorts
// ---------------------------------------------------------------------------

/// A litter produced by one reproduction.
///
/// `dead <= size` always holds. `last_year_rolled` only increases; year N's
/// mortality is applied exactly once, when the cohort's age crosses year N.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Cohort {
    /// Sequence number within the mother's life.
    pub id: CohortId,
    /// Age of the cohort in months.
    pub age_months: u32,
    /// Members still counted in the cohort (shrinks when daughters deploy out).
    pub size: u32,
    /// Female members counted in `size`.
    pub females: u32,
    /// Male members counted in `size`.
    pub males: u32,
    /// Running count of deaths among `size`.
    pub dead: u32,
    /// Running count of female deaths among `females`.
    pub dead_females: u32,
    /// Mortality curve selected at birth.
    pub path: BirthPath,
    /// Highest whole year whose mortality has been applied.
    pub last_year_rolled: u32,
    /// Whether the coming-of-age transition has happened.
    pub deployed_out: bool,
}

impl Cohort {
    /// Members still alive in the cohort.
    pub const fn alive(&self) -> u32 {
        self.size.saturating_sub(self.dead)
    }

    /// Female members still alive in the cohort.
    pub const fn alive_females(&self) -> u32 {
        self.females.saturating_sub(self.dead_females)
    }

    /// Male members still alive in the cohort.
    pub const fn alive_males(&self) -> u32 {
        self.alive().saturating_sub(self.alive_females())
    }

    /// Whole years of age.
    pub const fn age_years(&self) -> u32 {
        self.age_months / 12
    }

    /// A cohort with nobody left to age or deploy.
    pub const fn is_inert(&self) -> bool {
        self.alive() == 0 || self.deployed_out
    }
}

// ---------------------------------------------------------------------------
// Factions
// ---------------------------------------------------------------------------

/// Membership organization state. Both faction kinds share this shape.
///
/// `size` never exceeds the configured capacity; after a purge it is at most
/// `caches * per_cache_quota`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FactionState {
    /// Which faction this is.
    pub kind: FactionKind,
    /// Whether the founding action has happened.
    pub created: bool,
    /// Current membership.
    pub size: u32,
    /// Caches (union) or hideouts (league); each saves a quota through a purge.
    pub caches: u32,
    /// Background and explicit actions are suspended while hiding.
    pub hiding_active: bool,
    /// Age at which a hidden faction resurfaces.
    pub hidden_until_age: Option<f64>,
    /// Set once the capacity ceiling has been announced.
    pub capacity_reached: bool,
    /// Largest membership ever reached.
    pub peak_size: u32,
}

impl FactionState {
    /// An unfounded faction.
    pub const fn new(kind: FactionKind) -> Self {
        Self {
            kind,
            created: false,
            size: 0,
            caches: 0,
            hiding_active: false,
            hidden_until_age: None,
            capacity_reached: false,
            peak_size: 0,
        }
    }

    /// Founded and not in hiding.
    pub const fn is_operational(&self) -> bool {
        self.created && !self.hiding_active
    }
}

// ---------------------------------------------------------------------------
// Subject
// ---------------------------------------------------------------------------

/// The player-controlled subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SubjectState {
    /// Unique identifier of this life.
    pub id: SubjectId,
    /// 1-based index of this life within the session.
    pub life_number: u32,
    /// Age in years, advancing in half-year ticks.
    pub age: f64,
    /// Monotonic: once false, never true again.
    pub alive: bool,
    /// Set with `alive = false`.
    pub cause_of_death: Option<DeathCause>,
    /// Age beyond which ambient risk inflates; deployments extend it.
    pub lifespan_cap: f64,
    /// Set irreversibly on the first deployment survived.
    pub proven: bool,
    /// Deployments survived.
    pub deployments: u32,
    /// On the deployed track (set on the first deployment call).
    pub deployed: bool,
    /// On the outlander track.
    pub outlander: bool,
    /// Member of the rat hunters.
    pub rat_hunter: bool,
    /// Founder of the league.
    pub league_active: bool,
    /// Current husbands, oldest first.
    pub husbands: Vec<HusbandRecord>,
    /// Husbands ever accepted.
    pub husbands_taken: u32,
    /// Reputation for violence, 0 to 100.
    pub infamy: u32,
    /// Proven daughters over all daughters, 0 to 1.
    pub prestige: f64,
    /// Daughters ever born.
    pub daughters_total: u32,
    /// Daughters who came back from deployment.
    pub daughters_proven: u32,
    /// Prestige milestones already announced (0, 1 = half, 2 = full).
    pub prestige_milestones: u8,
    /// Duels won.
    pub duel_wins: u32,
    /// Hunter notoriety built by safaris and blood sports.
    pub hunter_notoriety: u32,
    /// Position in the gala flow.
    pub gala_stage: GalaStage,
    /// Terminal gala outcome, once recorded.
    pub gala_outcome: Option<GalaOutcome>,
    /// Litters, oldest first.
    pub cohorts: Vec<Cohort>,
    /// Identifier for the next litter.
    pub next_cohort_id: CohortId,
    /// Labor organization.
    pub union: FactionState,
    /// Counter-trafficking league.
    pub league: FactionState,
}

impl SubjectState {
    /// The lifestyle path the subject is on.
    pub const fn track(&self) -> Track {
        if self.outlander {
            Track::Outlander
        } else if self.deployed {
            Track::Deployed
        } else {
            Track::Baseline
        }
    }

    /// Number of current husbands.
    pub fn husband_count(&self) -> u32 {
        u32::try_from(self.husbands.len()).unwrap_or(u32::MAX)
    }

    /// The faction of the given kind.
    pub const fn faction(&self, kind: FactionKind) -> &FactionState {
        match kind {
            FactionKind::Union => &self.union,
            FactionKind::League => &self.league,
        }
    }

    /// Mutable access to the faction of the given kind.
    pub const fn faction_mut(&mut self, kind: FactionKind) -> &mut FactionState {
        match kind {
            FactionKind::Union => &mut self.union,
            FactionKind::League => &mut self.league,
        }
    }
}

// ---------------------------------------------------------------------------
// Archive and snapshots
// ---------------------------------------------------------------------------

/// Summary of a finished (or abandoned) life, kept in the session archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LifeSummary {
    /// The subject this summarizes.
    pub subject_id: SubjectId,
    /// 1-based index of the life within the session.
    pub life_number: u32,
    /// Age at death or reset.
    pub final_age: f64,
    /// Cause of death; `None` when the life was reset while alive.
    pub cause: Option<DeathCause>,
    /// Husbands ever accepted.
    pub husbands_taken: u32,
    /// Daughters ever born.
    pub daughters_total: u32,
    /// Daughters who came back proven.
    pub daughters_proven: u32,
    /// Deployments survived.
    pub deployments: u32,
    /// Whether the subject was proven.
    pub proven: bool,
    /// Final infamy.
    pub infamy: u32,
    /// Final prestige.
    pub prestige: f64,
    /// Duels won.
    pub duel_wins: u32,
    /// Peak union membership.
    pub union_peak: u32,
    /// Peak league membership.
    pub league_peak: u32,
    /// Milestone notifications from the life's journal.
    pub notable: Vec<Notification>,
    /// When the summary was archived.
    pub archived_at: DateTime<Utc>,
}

/// Read-only view of everything the engine tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StateSnapshot {
    /// The current subject.
    pub subject: SubjectState,
    /// Session-wide modifier stacks.
    pub modifier_stacks: u32,
    /// Lives archived so far in this session.
    pub lives_archived: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cohort() -> Cohort {
        Cohort {
            id: CohortId(0),
            age_months: 30,
            size: 6,
            females: 4,
            males: 2,
            dead: 3,
            dead_females: 2,
            path: BirthPath::Baseline,
            last_year_rolled: 2,
            deployed_out: false,
        }
    }

    #[test]
    fn cohort_counts() {
        let c = cohort();
        assert_eq!(c.alive(), 3);
        assert_eq!(c.alive_females(), 2);
        assert_eq!(c.alive_males(), 1);
        assert_eq!(c.age_years(), 2);
        assert!(!c.is_inert());
    }

    #[test]
    fn cohort_inert_when_empty_or_deployed() {
        let mut c = cohort();
        c.dead = c.size;
        assert!(c.is_inert());
        let mut c = cohort();
        c.deployed_out = true;
        assert!(c.is_inert());
    }

    #[test]
    fn new_faction_is_not_operational() {
        let f = FactionState::new(FactionKind::Union);
        assert!(!f.is_operational());
        assert_eq!(f.size, 0);
    }
}
