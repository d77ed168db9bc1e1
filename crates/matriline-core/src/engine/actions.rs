//! The action API.
//!
//! [`LifeEngine::can_perform`] is the precondition predicate. Calling an
//! action whose precondition is false is a silent no-op: no state change, no
//! notification, no time. Every action that does not end in a lethal
//! outcome runs the tick pipeline before returning.

use matriline_types::{
    Action, BirthPath, DeathCause, EventKey, FactionEvent, FactionKind, GalaOutcome, GalaStage,
    HusbandRecord, SubjectState, Track,
};
use tracing::{debug, info};

use super::LifeEngine;
use crate::cohort;
use crate::effects::TickEffects;
use crate::faction;
use crate::gala::{self, GalaStep};
use crate::mortality;
use crate::subject::add_infamy;
use crate::text::Params;

impl LifeEngine {
    /// Whether `action` is allowed in the current state.
    pub fn can_perform(&self, action: Action) -> bool {
        let s = &self.subject;
        if !s.alive {
            return false;
        }
        let fc = &self.config.faction;
        match action {
            Action::Wait | Action::Reproduce | Action::AddHusband | Action::Deploy => true,
            Action::JoinOutlanders => !s.outlander && !s.proven && s.deployments == 0,
            Action::CreateUnion => s.outlander && !s.union.created,
            Action::FormLeague => {
                s.gala_outcome == Some(GalaOutcome::You) && !s.rat_hunter && !s.league.created
            }
            Action::ExpandUnion
            | Action::BuildCache
            | Action::Sabotage
            | Action::ExpandLeague
            | Action::BuildHideout
            | Action::HuntTheHunter => action
                .faction()
                .is_some_and(|kind| s.faction(kind).is_operational()),
            Action::Revolt | Action::EnactPurge => action.faction().is_some_and(|kind| {
                let f = s.faction(kind);
                f.is_operational() && faction::uprising_unlocked(f, fc)
            }),
            Action::AttendGala => {
                !s.outlander
                    && gala::next_stage(s.gala_stage, s.gala_outcome, GalaStep::Attend).is_some()
            }
            Action::GalaIgnore => {
                gala::next_stage(s.gala_stage, s.gala_outcome, GalaStep::Ignore).is_some()
            }
            Action::GalaInvestigate => {
                gala::next_stage(s.gala_stage, s.gala_outcome, GalaStep::Investigate).is_some()
            }
            Action::JoinRatHunters => {
                !s.league_active
                    && gala::next_stage(s.gala_stage, s.gala_outcome, GalaStep::Join).is_some()
            }
            Action::GalaDecline => {
                gala::next_stage(s.gala_stage, s.gala_outcome, GalaStep::Decline).is_some()
            }
            Action::AttendSafari | Action::AttendBloodSports => s.rat_hunter,
            Action::StartDuel => s.deployments >= 1,
        }
    }

    /// Every action currently allowed, in declaration order.
    pub fn available_actions(&self) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|action| self.can_perform(*action))
            .collect()
    }

    /// Perform `action` if its precondition holds.
    pub fn perform(&mut self, action: Action) {
        if !self.can_perform(action) {
            debug!(action = %action, "precondition failed, ignoring action");
            return;
        }
        debug!(action = %action, age = self.subject.age, "performing action");
        match action {
            Action::Wait => self.full_tick(),
            Action::Reproduce => self.do_reproduce(),
            Action::AddHusband => self.do_add_husband(),
            Action::Deploy => self.do_deploy(),
            Action::JoinOutlanders => self.do_join_outlanders(),
            Action::CreateUnion => self.do_found(FactionKind::Union),
            Action::FormLeague => self.do_found(FactionKind::League),
            Action::ExpandUnion => self.do_expand(FactionKind::Union),
            Action::ExpandLeague => self.do_expand(FactionKind::League),
            Action::BuildCache => self.do_build_cache(FactionKind::Union),
            Action::BuildHideout => self.do_build_cache(FactionKind::League),
            Action::Sabotage => self.do_strike(FactionKind::Union),
            Action::HuntTheHunter => self.do_strike(FactionKind::League),
            Action::Revolt => self.do_uprising(FactionKind::Union),
            Action::EnactPurge => self.do_uprising(FactionKind::League),
            Action::AttendGala => self.do_gala(GalaStep::Attend),
            Action::GalaIgnore => self.do_gala(GalaStep::Ignore),
            Action::GalaInvestigate => self.do_gala(GalaStep::Investigate),
            Action::JoinRatHunters => self.do_gala(GalaStep::Join),
            Action::GalaDecline => self.do_gala(GalaStep::Decline),
            Action::AttendSafari => self.do_hunt_event(false),
            Action::AttendBloodSports => self.do_hunt_event(true),
            Action::StartDuel => self.do_duel(),
        }
    }

    // -----------------------------------------------------------------------
    // Named actions
    // -----------------------------------------------------------------------

    /// Let half a year pass.
    pub fn wait(&mut self) {
        self.perform(Action::Wait);
    }

    /// Bear a litter; refused without a husband.
    pub fn reproduce(&mut self) {
        self.perform(Action::Reproduce);
    }

    /// Court another husband.
    pub fn add_husband(&mut self) {
        self.perform(Action::AddHusband);
    }

    /// Deploy for a multi-year block. Lethal on the outlander track.
    pub fn deploy(&mut self) {
        self.perform(Action::Deploy);
    }

    /// Join the outlanders.
    pub fn join_outlanders(&mut self) {
        self.perform(Action::JoinOutlanders);
    }

    /// Found the union.
    pub fn create_union(&mut self) {
        self.perform(Action::CreateUnion);
    }

    /// Recruit for the union.
    pub fn expand_union(&mut self) {
        self.perform(Action::ExpandUnion);
    }

    /// Build a union cache.
    pub fn build_cache(&mut self) {
        self.perform(Action::BuildCache);
    }

    /// Sabotage an employer.
    pub fn sabotage(&mut self) {
        self.perform(Action::Sabotage);
    }

    /// Launch the union revolt.
    pub fn revolt(&mut self) {
        self.perform(Action::Revolt);
    }

    /// Found the league.
    pub fn form_league(&mut self) {
        self.perform(Action::FormLeague);
    }

    /// Recruit for the league.
    pub fn expand_league(&mut self) {
        self.perform(Action::ExpandLeague);
    }

    /// Build a league hideout.
    pub fn build_hideout(&mut self) {
        self.perform(Action::BuildHideout);
    }

    /// Hunt one of the hunters.
    pub fn hunt_the_hunter(&mut self) {
        self.perform(Action::HuntTheHunter);
    }

    /// Launch the league purge.
    pub fn enact_purge(&mut self) {
        self.perform(Action::EnactPurge);
    }

    /// Attend the gala.
    pub fn attend_gala(&mut self) {
        self.perform(Action::AttendGala);
    }

    /// Ignore the whispers at the gala.
    pub fn gala_ignore(&mut self) {
        self.perform(Action::GalaIgnore);
    }

    /// Investigate the whispers at the gala.
    pub fn gala_investigate(&mut self) {
        self.perform(Action::GalaInvestigate);
    }

    /// Join the rat hunters.
    pub fn join_rat_hunters(&mut self) {
        self.perform(Action::JoinRatHunters);
    }

    /// Decline the rat hunters.
    pub fn gala_decline(&mut self) {
        self.perform(Action::GalaDecline);
    }

    /// Attend a safari.
    pub fn attend_safari(&mut self) {
        self.perform(Action::AttendSafari);
    }

    /// Attend the blood sports.
    pub fn attend_blood_sports(&mut self) {
        self.perform(Action::AttendBloodSports);
    }

    /// Challenge someone to a duel.
    pub fn start_duel(&mut self) {
        self.perform(Action::StartDuel);
    }

    // -----------------------------------------------------------------------
    // Family
    // -----------------------------------------------------------------------

    fn do_reproduce(&mut self) {
        if self.subject.husbands.is_empty() {
            self.emit(EventKey::NeedHusband, Params::new());
            return;
        }
        let r = &self.config.reproduction;
        let litter = self.rng.range_inclusive(r.litter_min, r.litter_max);
        let survival = cohort::juvenile_survival(self.subject.husband_count(), &self.config);
        let path = birth_path(&self.subject);
        let id = self.subject.next_cohort_id;
        self.subject.next_cohort_id = id.next();
        let born = cohort::birth(
            id,
            path,
            litter,
            survival,
            self.config.reproduction.female_ratio,
            self.rng.as_mut(),
        );
        let daughters = born.alive_females();
        let survivors = born.alive();
        self.subject.daughters_total = self.subject.daughters_total.saturating_add(daughters);
        self.subject.cohorts.push(born);
        self.emit(
            EventKey::Litter,
            Params::new()
                .with("count", litter)
                .with("daughters", daughters)
                .with("survivors", survivors),
        );
        self.announce_prestige();
        self.full_tick();
    }

    fn do_add_husband(&mut self) {
        let accepted = match self.subject.track() {
            Track::Deployed => {
                let fear = mortality::fear_rejection_chance(self.subject.infamy, &self.config);
                if self.rng.chance(fear) {
                    self.emit(EventKey::HusbandFeared, Params::new());
                    false
                } else if self.rng.chance(self.config.marriage.deployed_acceptance) {
                    true
                } else {
                    self.emit(EventKey::HusbandRejected, Params::new());
                    false
                }
            }
            track => {
                let acceptance = if track == Track::Outlander {
                    self.config.marriage.outlander_acceptance
                } else {
                    self.config.marriage.baseline_acceptance
                };
                if self.rng.chance(acceptance) {
                    true
                } else {
                    self.emit(EventKey::HusbandRejected, Params::new());
                    if self.rng.chance(self.config.marriage.suitor_house_lethal) {
                        self.die(DeathCause::SuitorHouse);
                        return;
                    }
                    false
                }
            }
        };

        if accepted {
            self.subject.husbands.push(HusbandRecord {
                taken_at_age: self.subject.age,
            });
            self.subject.husbands_taken = self.subject.husbands_taken.saturating_add(1);
            let total = self.subject.husband_count();
            self.emit(EventKey::HusbandAccepted, Params::new().with("total", total));
        }
        self.full_tick();
    }

    // -----------------------------------------------------------------------
    // Tracks
    // -----------------------------------------------------------------------

    fn do_deploy(&mut self) {
        if self.subject.outlander {
            self.die(DeathCause::DeserterExecuted);
            return;
        }
        let p = mortality::deployment_mortality(&self.subject, &self.config);
        self.subject.deployed = true;
        debug!(p, deployments = self.subject.deployments, "deployment mortality");
        if self.rng.chance(p) {
            self.die(DeathCause::KilledDeployed);
            return;
        }

        let first = self.subject.deployments == 0;
        self.subject.deployments = self.subject.deployments.saturating_add(1);
        if first {
            self.subject.proven = true;
            info!(life = self.subject.life_number, age = self.subject.age, "subject proven");
            self.emit(EventKey::Proven, Params::new());
        }
        add_infamy(&mut self.subject, self.config.deployment.infamy_gain);
        self.subject.lifespan_cap += self.config.deployment.lifespan_extension_years;
        let deployments = self.subject.deployments;
        self.emit(
            EventKey::DeploySurvived,
            Params::new().with("deployments", deployments),
        );

        let ticks = self.config.time.ticks_for(self.config.deployment.block_years);
        self.time_skip(
            ticks.saturating_sub(1),
            TickEffects::flavor(EventKey::ReturnedHome),
        );
    }

    fn do_join_outlanders(&mut self) {
        self.subject.outlander = true;
        info!(life = self.subject.life_number, "joined outlanders");
        self.emit(EventKey::JoinedOutlanders, Params::new());
        self.full_tick();
    }

    // -----------------------------------------------------------------------
    // Factions
    // -----------------------------------------------------------------------

    fn do_found(&mut self, kind: FactionKind) {
        if self.rng.chance(self.config.faction.found_lethal) {
            self.die(DeathCause::FoundingBetrayed);
            return;
        }
        faction::found(self.subject.faction_mut(kind), &self.config.faction);
        if kind == FactionKind::League {
            self.subject.league_active = true;
        }
        info!(faction = %kind, "faction founded");
        self.emit(EventKey::Faction(kind, FactionEvent::Founded), Params::new());
        self.full_tick();
    }

    fn do_expand(&mut self, kind: FactionKind) {
        let fc = &self.config.faction;
        let drive = self.rng.range_inclusive(fc.expand_min, fc.expand_max);
        if self.rng.chance(self.config.faction.expand_lethal) {
            self.die(DeathCause::Informant);
            return;
        }
        let joined = faction::recruit(self.subject.faction_mut(kind), drive, &self.config.faction);
        let size = self.subject.faction(kind).size;
        self.emit(
            EventKey::Faction(kind, FactionEvent::Expanded),
            Params::new().with("count", joined).with("size", size),
        );
        self.announce_capacity(kind);
        self.full_tick();
    }

    fn do_build_cache(&mut self, kind: FactionKind) {
        if self.rng.chance(self.config.faction.cache_lethal) {
            self.die(DeathCause::CacheRaided);
            return;
        }
        let f = self.subject.faction_mut(kind);
        faction::build_cache(f);
        let caches = f.caches;
        self.emit(
            EventKey::Faction(kind, FactionEvent::CacheBuilt),
            Params::new().with("caches", caches),
        );
        self.full_tick();
    }

    fn do_strike(&mut self, kind: FactionKind) {
        if self.rng.chance(self.config.faction.strike_lethal) {
            self.die(DeathCause::StrikeKilled);
            return;
        }
        add_infamy(&mut self.subject, self.config.faction.strike_infamy_gain);
        let _ = faction::recruit(
            self.subject.faction_mut(kind),
            self.config.faction.strike_recruits,
            &self.config.faction,
        );
        self.emit(EventKey::Faction(kind, FactionEvent::Strike), Params::new());
        self.announce_capacity(kind);
        self.full_tick();
    }

    fn do_uprising(&mut self, kind: FactionKind) {
        let stacks = self.session.modifier_stacks();
        let size = self.subject.faction(kind).size;
        let p = faction::uprising_chance(size, stacks, &self.config.faction);
        info!(faction = %kind, size, stacks, p, "uprising launched");

        if self.rng.chance(p) {
            add_infamy(&mut self.subject, self.config.faction.uprising_infamy_gain);
            self.emit(EventKey::Faction(kind, FactionEvent::UprisingWon), Params::new());
            let stacks = self.session.gain_stack();
            self.emit(EventKey::ModifierGained, Params::new().with("stacks", stacks));
            self.full_tick();
            return;
        }

        self.emit(EventKey::Faction(kind, FactionEvent::UprisingFailed), Params::new());
        self.purge_and_hide(kind);
        if self.rng.chance(self.config.faction.uncovered_lethal) {
            self.die(DeathCause::Uncovered);
            return;
        }
        let ticks = self.config.time.ticks_for(self.config.faction.hiding_years);
        self.time_skip(
            ticks.saturating_sub(1),
            TickEffects::flavor(EventKey::EmergedFromHiding),
        );
    }

    // -----------------------------------------------------------------------
    // Gala and hunter economy
    // -----------------------------------------------------------------------

    fn do_gala(&mut self, step: GalaStep) {
        let Some(stage) =
            gala::next_stage(self.subject.gala_stage, self.subject.gala_outcome, step)
        else {
            return;
        };
        let leverage = step == GalaStep::Investigate
            && self.rng.chance(self.config.gala.investigate_you_chance);
        self.subject.gala_stage = stage;
        if let Some(outcome) = gala::outcome_of(step, leverage) {
            self.subject.gala_outcome = Some(outcome);
        }

        let key = match (step, leverage) {
            (GalaStep::Attend, _) => EventKey::GalaIntro,
            (GalaStep::Ignore, _) => EventKey::GalaIgnored,
            (GalaStep::Investigate, true) => EventKey::GalaLeverage,
            (GalaStep::Investigate, false) => EventKey::GalaRebuffed,
            (GalaStep::Join, _) => {
                self.subject.rat_hunter = true;
                info!(life = self.subject.life_number, "joined rat hunters");
                EventKey::RatHuntersJoined
            }
            (GalaStep::Decline, _) => EventKey::RatHuntersDeclined,
        };
        self.emit(key, Params::new());
        let effects = if self.subject.gala_stage == GalaStage::Intro {
            TickEffects::default()
        } else {
            TickEffects::quiet()
        };
        self.full_tick_with(effects);
    }

    fn do_hunt_event(&mut self, blood_sports: bool) {
        let h = &self.config.hunter;
        let (lethal, infamy, notoriety, cause, key) = if blood_sports {
            (
                h.blood_sport_lethal,
                h.blood_sport_infamy,
                h.notoriety_per_blood_sport,
                DeathCause::BloodSport,
                EventKey::BloodSports,
            )
        } else {
            (
                h.safari_lethal,
                h.safari_infamy,
                h.notoriety_per_safari,
                DeathCause::SafariAccident,
                EventKey::Safari,
            )
        };
        if self.rng.chance(lethal) {
            self.die(cause);
            return;
        }
        add_infamy(&mut self.subject, infamy);
        self.subject.hunter_notoriety = self.subject.hunter_notoriety.saturating_add(notoriety);
        self.emit(key, Params::new());
        self.full_tick();
    }

    fn do_duel(&mut self) {
        let p = mortality::duel_win_chance(&self.subject, &self.config);
        debug!(p, wins = self.subject.duel_wins, "duel");
        if !self.rng.chance(p) {
            self.die(DeathCause::DuelLost);
            return;
        }
        self.subject.duel_wins = self.subject.duel_wins.saturating_add(1);
        add_infamy(&mut self.subject, self.config.duel.infamy_gain);
        let wins = self.subject.duel_wins;
        self.emit(EventKey::DuelWon, Params::new().with("wins", wins));
        self.full_tick();
    }
}

/// Mortality curve for a litter born now.
const fn birth_path(subject: &SubjectState) -> BirthPath {
    if subject.rat_hunter {
        return BirthPath::RatHunter;
    }
    match subject.track() {
        Track::Outlander => BirthPath::Outlander,
        Track::Deployed => BirthPath::Deployed,
        Track::Baseline => BirthPath::Baseline,
    }
}
