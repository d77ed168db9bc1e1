//! The life controller: owns the subject, runs the tick pipeline and exposes
//! the action API.
//!
//! A [`LifeEngine`] is built once per session through [`EngineBuilder`]. It
//! holds the validated configuration, the [`Session`] shared by every life,
//! the current subject, the random source and the text lookup. Every
//! notification is rendered once, recorded in the per-life [`Journal`] and
//! forwarded to the attached [`NotificationSink`].
//!
//! Lifecycle: [`LifeEngine::die`] finalizes and archives a life;
//! [`LifeEngine::reset`] is a separate call that starts the next one.

mod actions;
mod tick;

use chrono::Utc;
use matriline_types::{
    DeathCause, EventKey, LifeSummary, Notification, StateSnapshot, SubjectState,
};
use tracing::info;

use crate::config::EngineConfig;
use crate::effects::TickEffects;
use crate::error::EngineError;
use crate::notify::{Journal, NotificationSink};
use crate::random::{RandomSource, SeededSource};
use crate::session::Session;
use crate::subject::fresh_subject;
use crate::text::{NoText, Params, Renderer, TextLookup};

/// Builder for a [`LifeEngine`].
pub struct EngineBuilder {
    config: EngineConfig,
    session: Session,
    rng: Option<Box<dyn RandomSource>>,
    text: Box<dyn TextLookup>,
    sink: Option<Box<dyn NotificationSink>>,
}

impl EngineBuilder {
    /// Continue an existing session instead of starting a fresh one.
    #[must_use]
    pub fn session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// Use `rng` for every probability gate.
    #[must_use]
    pub fn random(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Use a reproducible standard generator seeded with `seed`.
    #[must_use]
    pub fn seed(self, seed: u64) -> Self {
        self.random(SeededSource::new(seed))
    }

    /// Look notification text up in `text`.
    #[must_use]
    pub fn text(mut self, text: impl TextLookup + 'static) -> Self {
        self.text = Box::new(text);
        self
    }

    /// Forward every notification to `sink`.
    #[must_use]
    pub fn sink(mut self, sink: impl NotificationSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Start the first life of the session.
    pub fn build(mut self) -> LifeEngine {
        let life_number = self.session.next_life();
        let subject = fresh_subject(&self.config, life_number);
        let mut engine = self.into_engine(subject);
        engine.begin_life();
        engine
    }

    /// Resume from a snapshot.
    ///
    /// The session's modifier stacks are raised to the snapshot's when they
    /// are lower. A subject whose life the session already archived stays
    /// archived.
    pub fn restore(mut self, snapshot: StateSnapshot) -> Result<LifeEngine, EngineError> {
        validate(&snapshot.subject, &self.config)?;
        self.session.raise_stacks_to(snapshot.modifier_stacks);
        while self.session.lives_started() < snapshot.subject.life_number {
            let _ = self.session.next_life();
        }
        Ok(self.into_engine(snapshot.subject))
    }

    fn into_engine(self, subject: SubjectState) -> LifeEngine {
        // A life already in the archive must not be archived again on reset.
        let archived = self
            .session
            .archive()
            .iter()
            .any(|summary| summary.subject_id == subject.id);
        LifeEngine {
            config: self.config,
            session: self.session,
            subject,
            rng: self
                .rng
                .unwrap_or_else(|| Box::new(SeededSource::from_entropy())),
            text: self.text,
            renderer: Renderer::new(),
            sink: self.sink,
            journal: Journal::new(),
            effects: TickEffects::default(),
            archived,
        }
    }
}

/// Reject snapshots that break a state invariant.
fn validate(subject: &SubjectState, config: &EngineConfig) -> Result<(), EngineError> {
    let invalid = |reason: &str| EngineError::InvalidSnapshot {
        reason: reason.to_owned(),
    };
    if !subject.age.is_finite() || subject.age < 0.0 {
        return Err(invalid("age must be finite and not negative"));
    }
    if !subject.prestige.is_finite() || !(0.0..=1.0).contains(&subject.prestige) {
        return Err(invalid("prestige must be within [0, 1]"));
    }
    if subject.infamy > crate::subject::MAX_INFAMY {
        return Err(invalid("infamy exceeds 100"));
    }
    if subject.outlander && subject.deployed {
        return Err(invalid("outlander and deployed tracks are exclusive"));
    }
    if subject.rat_hunter && subject.league_active {
        return Err(invalid("rat hunter and league founder are exclusive"));
    }
    for cohort in &subject.cohorts {
        if cohort.dead > cohort.size || cohort.dead_females > cohort.females {
            return Err(invalid("cohort has more dead than members"));
        }
        if cohort.females > cohort.size {
            return Err(invalid("cohort has more females than members"));
        }
    }
    for faction in [&subject.union, &subject.league] {
        if faction.size > config.faction.capacity {
            return Err(invalid("faction exceeds capacity"));
        }
    }
    Ok(())
}

/// The per-subject state machine.
pub struct LifeEngine {
    config: EngineConfig,
    session: Session,
    subject: SubjectState,
    rng: Box<dyn RandomSource>,
    text: Box<dyn TextLookup>,
    renderer: Renderer,
    sink: Option<Box<dyn NotificationSink>>,
    journal: Journal,
    effects: TickEffects,
    archived: bool,
}

impl LifeEngine {
    /// Builder for an engine with `config`.
    pub fn builder(config: EngineConfig) -> EngineBuilder {
        EngineBuilder {
            config: config.sanitized(),
            session: Session::new(),
            rng: None,
            text: Box::new(NoText),
            sink: None,
        }
    }

    /// Engine with `config`, a fresh session and the given random source.
    pub fn new(config: EngineConfig, rng: impl RandomSource + 'static) -> Self {
        Self::builder(config).random(rng).build()
    }

    /// Engine resumed from `snapshot` with the given random source.
    pub fn from_parts(
        config: EngineConfig,
        snapshot: StateSnapshot,
        rng: impl RandomSource + 'static,
    ) -> Result<Self, EngineError> {
        Self::builder(config).random(rng).restore(snapshot)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The current subject.
    pub const fn subject(&self) -> &SubjectState {
        &self.subject
    }

    /// The session shared by every life.
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// The validated configuration.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Notifications of the current life.
    pub const fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Whether the current subject is alive.
    pub const fn is_alive(&self) -> bool {
        self.subject.alive
    }

    /// Read-only copy of everything the engine tracks.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            subject: self.subject.clone(),
            modifier_stacks: self.session.modifier_stacks(),
            lives_archived: self.session.lives_archived(),
        }
    }

    /// End the engine and hand back the session for reuse.
    pub fn into_session(self) -> Session {
        self.session
    }

    // -----------------------------------------------------------------------
    // Death and rebirth
    // -----------------------------------------------------------------------

    /// Kill the subject with `cause` and archive the life.
    ///
    /// A no-op when the subject is already dead.
    pub fn die(&mut self, cause: DeathCause) {
        if !self.subject.alive {
            return;
        }
        self.subject.alive = false;
        self.subject.cause_of_death = Some(cause);
        info!(
            life = self.subject.life_number,
            age = self.subject.age,
            cause = %cause,
            "subject died"
        );
        self.emit(EventKey::Death(cause), Params::new());
        self.archive_current();
    }

    /// Archive the current subject if needed and start a fresh one.
    ///
    /// The session (modifier stacks, archive) carries over.
    pub fn reset(&mut self) {
        self.archive_current();
        self.journal.clear();
        self.effects = TickEffects::default();
        let life_number = self.session.next_life();
        self.subject = fresh_subject(&self.config, life_number);
        self.archived = false;
        self.begin_life();
    }

    fn begin_life(&mut self) {
        info!(
            life = self.subject.life_number,
            stacks = self.session.modifier_stacks(),
            "life begun"
        );
        self.emit(EventKey::LifeBegun, Params::new());
    }

    fn archive_current(&mut self) {
        if self.archived {
            return;
        }
        let s = &self.subject;
        let summary = LifeSummary {
            subject_id: s.id,
            life_number: s.life_number,
            final_age: s.age,
            cause: s.cause_of_death,
            husbands_taken: s.husbands_taken,
            daughters_total: s.daughters_total,
            daughters_proven: s.daughters_proven,
            deployments: s.deployments,
            proven: s.proven,
            infamy: s.infamy,
            prestige: s.prestige,
            duel_wins: s.duel_wins,
            union_peak: s.union.peak_size,
            league_peak: s.league.peak_size,
            notable: self.journal.notable(),
            archived_at: Utc::now(),
        };
        self.session.archive_life(summary);
        self.archived = true;
    }

    // -----------------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------------

    /// Render, record and forward one notification.
    fn emit(&mut self, key: EventKey, params: Params) {
        let params = params.with("age", self.subject.age);
        let text = self.renderer.resolve(self.text.as_ref(), key, &params);
        let note = Notification {
            key,
            text,
            age: self.subject.age,
        };
        if let Some(sink) = self.sink.as_mut() {
            sink.notify(&note);
        }
        self.journal.record(note);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedSource;

    #[test]
    fn build_starts_first_life() {
        let engine = LifeEngine::new(EngineConfig::default(), ScriptedSource::constant(0.5));
        assert!(engine.is_alive());
        assert_eq!(engine.subject().life_number, 1);
        assert_eq!(engine.journal().len(), 1);
        assert!(engine.journal().contains(EventKey::LifeBegun));
    }

    #[test]
    fn die_archives_once() {
        let mut engine = LifeEngine::new(EngineConfig::default(), ScriptedSource::constant(0.5));
        engine.die(DeathCause::Fever);
        engine.die(DeathCause::Accident);
        assert!(!engine.is_alive());
        assert_eq!(engine.subject().cause_of_death, Some(DeathCause::Fever));
        assert_eq!(engine.session().lives_archived(), 1);
        assert_eq!(engine.journal().count(EventKey::Death(DeathCause::Fever)), 1);
        engine.reset();
        assert_eq!(engine.session().lives_archived(), 1);
        assert_eq!(engine.subject().life_number, 2);
    }

    #[test]
    fn reset_while_alive_archives_abandoned_life() {
        let mut engine = LifeEngine::new(EngineConfig::default(), ScriptedSource::constant(0.5));
        engine.reset();
        let archive = engine.session().archive();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.first().and_then(|s| s.cause), None);
    }

    #[test]
    fn sink_receives_notifications() {
        let engine = LifeEngine::builder(EngineConfig::default())
            .random(ScriptedSource::constant(0.5))
            .sink(crate::notify::NoOpSink)
            .build();
        assert_eq!(engine.journal().len(), 1);
    }

    #[test]
    fn restore_rejects_broken_snapshot() {
        let engine = LifeEngine::new(EngineConfig::default(), ScriptedSource::constant(0.5));
        let mut snapshot = engine.snapshot();
        snapshot.subject.union.size = 20_000;
        let restored = LifeEngine::from_parts(
            EngineConfig::default(),
            snapshot,
            ScriptedSource::constant(0.5),
        );
        assert!(matches!(restored, Err(EngineError::InvalidSnapshot { .. })));
    }

    #[test]
    fn restore_carries_stacks() {
        let engine = LifeEngine::new(EngineConfig::default(), ScriptedSource::constant(0.5));
        let mut snapshot = engine.snapshot();
        snapshot.modifier_stacks = 4;
        let restored = LifeEngine::from_parts(
            EngineConfig::default(),
            snapshot,
            ScriptedSource::constant(0.5),
        );
        let stacks = restored.map(|e| e.session().modifier_stacks()).ok();
        assert_eq!(stacks, Some(4));
    }
}
