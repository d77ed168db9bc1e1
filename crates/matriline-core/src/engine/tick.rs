//! The tick pipeline.
//!
//! Full tick, in this order:
//!
//! 1. advance age, resurface factions whose hiding period has elapsed
//! 2. husband attrition (age-out, jealousy)
//! 3. one ambient mortality draw; a death picks its cause from the pool
//! 4. cohort year processing
//! 5. faction background ticks (union, then league)
//! 6. annihilation check for rat hunters
//! 7. the flavor line chosen by the pending [`TickEffects`]
//!
//! Once the subject is dead every later lethal step is skipped, so a tick
//! records at most one death. A reduced tick (used inside time skips) runs
//! only step 1 and step 4.

use matriline_types::{DeathCause, EventKey, FactionEvent, FactionKind};
use tracing::debug;

use super::LifeEngine;
use crate::cohort;
use crate::effects::TickEffects;
use crate::faction::{self, Background};
use crate::mortality::{self, CausePool};
use crate::subject::{PrestigeMilestone, recompute_prestige};
use crate::text::Params;

impl LifeEngine {
    /// Run one full tick with `effects` deciding the closing flavor line.
    pub(super) fn full_tick_with(&mut self, effects: TickEffects) {
        self.effects = effects;
        self.full_tick();
    }

    /// Run one full tick.
    pub(super) fn full_tick(&mut self) {
        if !self.subject.alive {
            return;
        }
        let resurfaced = self.advance_clock();
        self.husband_attrition();
        self.ambient_draw();
        if self.subject.alive {
            self.cohort_step();
        }
        for kind in [FactionKind::Union, FactionKind::League] {
            if !self.subject.alive {
                break;
            }
            if resurfaced.contains(&kind) {
                continue;
            }
            self.faction_step(kind);
        }
        if self.subject.alive {
            self.annihilation_check();
        }

        let alive = self.subject.alive;
        if let Some(key) = self.effects.take().flavor_key().filter(|_| alive) {
            self.emit(key, Params::new());
        }
    }

    /// Run one reduced tick: age, resurfacing and cohorts only.
    pub(super) fn reduced_tick(&mut self) {
        if !self.subject.alive {
            return;
        }
        let _ = self.advance_clock();
        self.cohort_step();
    }

    /// Run `skipped` reduced ticks followed by one full tick.
    pub(super) fn time_skip(&mut self, skipped: u32, closing: TickEffects) {
        for _ in 0..skipped {
            self.reduced_tick();
        }
        self.full_tick_with(closing);
    }

    /// Advance age by one tick and resurface due factions. Returns the
    /// factions that resurfaced.
    fn advance_clock(&mut self) -> Vec<FactionKind> {
        self.subject.age += self.config.time.tick_years;
        let mut resurfaced = Vec::new();
        for kind in [FactionKind::Union, FactionKind::League] {
            let age = self.subject.age;
            if faction::resurface_if_due(self.subject.faction_mut(kind), age) {
                self.emit(EventKey::Faction(kind, FactionEvent::Resurfaced), Params::new());
                resurfaced.push(kind);
            }
        }
        resurfaced
    }

    // -----------------------------------------------------------------------
    // Pipeline steps
    // -----------------------------------------------------------------------

    fn husband_attrition(&mut self) {
        let age = self.subject.age;
        let duration = self.config.marriage.union_duration_years;
        let before = self.subject.husbands.len();
        self.subject
            .husbands
            .retain(|h| age - h.taken_at_age < duration);
        let aged_out = before.saturating_sub(self.subject.husbands.len());
        if aged_out > 0 {
            let count = u32::try_from(aged_out).unwrap_or(u32::MAX);
            self.emit(EventKey::HusbandsAgedOut, Params::new().with("count", count));
        }

        let husbands = self.subject.husband_count();
        if husbands >= 2 {
            let p = mortality::jealousy_chance(husbands, &self.config);
            if self.rng.chance(p) {
                // The newest husband is the one killed.
                let _ = self.subject.husbands.pop();
                self.emit(EventKey::HusbandSlain, Params::new());
            }
        }
    }

    fn ambient_draw(&mut self) {
        let p = mortality::ambient_probability(
            &self.subject,
            self.session.modifier_stacks(),
            &self.config,
        );
        debug!(age = self.subject.age, p, "ambient mortality");
        if self.rng.chance(p) {
            let pool = CausePool::assemble(&self.subject, &self.config.mortality);
            let cause = pool.pick(self.rng.next_f64());
            self.die(cause);
        }
    }

    fn cohort_step(&mut self) {
        let months = self.config.time.months_per_tick();
        let mut reports = Vec::new();
        for c in &mut self.subject.cohorts {
            let progress = cohort::advance(c, months, &self.config.cohort, self.rng.as_mut());
            if progress != cohort::CohortProgress::default() {
                reports.push(progress);
            }
        }

        for progress in reports {
            for deaths in &progress.deaths {
                self.emit(
                    EventKey::CohortDeaths,
                    Params::new()
                        .with("count", deaths.count)
                        .with("year", deaths.year),
                );
            }
            if let Some(outcome) = progress.came_of_age.filter(|o| o.deployed > 0) {
                self.subject.daughters_proven =
                    self.subject.daughters_proven.saturating_add(outcome.survived);
                self.emit(
                    EventKey::CohortDeployed,
                    Params::new()
                        .with("deployed", outcome.deployed)
                        .with("survived", outcome.survived),
                );
                self.announce_prestige();
            }
        }
    }

    fn faction_step(&mut self, kind: FactionKind) {
        let outcome = faction::background_tick(
            self.subject.faction_mut(kind),
            &self.config.faction,
            self.rng.as_mut(),
        );
        match outcome {
            Background::Idle => {}
            Background::Churned { .. } => self.announce_capacity(kind),
            Background::StealthFailure => {
                debug!(faction = %kind, "stealth failure");
                self.purge_and_hide(kind);
                if self.rng.chance(self.config.faction.uncovered_lethal) {
                    self.die(DeathCause::Uncovered);
                }
            }
        }
    }

    fn annihilation_check(&mut self) {
        if !self.subject.rat_hunter || self.subject.hunter_notoriety == 0 {
            return;
        }
        let p = mortality::annihilation_chance(self.subject.hunter_notoriety, &self.config);
        if self.rng.chance(p) {
            self.die(DeathCause::HuntedDown);
        }
    }

    // -----------------------------------------------------------------------
    // Shared helpers
    // -----------------------------------------------------------------------

    /// Purge a faction to its cache quota and hide it for the configured
    /// period.
    pub(super) fn purge_and_hide(&mut self, kind: FactionKind) {
        let until = self.subject.age + self.config.faction.hiding_years;
        let f = self.subject.faction_mut(kind);
        let survivors = faction::purge(f, &self.config.faction);
        faction::hide(f, until);
        self.emit(
            EventKey::Faction(kind, FactionEvent::Purged),
            Params::new().with("size", survivors),
        );
        self.emit(EventKey::Faction(kind, FactionEvent::Hiding), Params::new());
    }

    /// Announce the capacity ceiling the first time a faction reaches it.
    pub(super) fn announce_capacity(&mut self, kind: FactionKind) {
        if faction::mark_capacity(self.subject.faction_mut(kind), &self.config.faction) {
            self.emit(EventKey::Faction(kind, FactionEvent::FullyOrganized), Params::new());
        }
    }

    /// Recompute prestige and announce newly crossed milestones.
    pub(super) fn announce_prestige(&mut self) {
        for milestone in recompute_prestige(&mut self.subject) {
            let key = match milestone {
                PrestigeMilestone::Half => EventKey::PrestigeHalf,
                PrestigeMilestone::Full => EventKey::PrestigeFull,
            };
            self.emit(key, Params::new());
        }
    }
}
