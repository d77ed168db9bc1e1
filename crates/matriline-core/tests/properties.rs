//! Invariants that must hold for every subject, checked over long seeded
//! runs and forced-outcome scripts.

// Integration tests use unwrap extensively for clarity -- panicking on
// failure is the correct behavior in test code.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::too_many_lines
)]

use matriline_core::faction::{cache_quota, uprising_chance};
use matriline_core::subject::fresh_subject;
use matriline_core::{EngineConfig, LifeEngine, ScriptedSource, SeededSource};
use matriline_types::{
    Action, DeathCause, EventKey, FactionEvent, FactionKind, GalaOutcome, GalaStage,
    StateSnapshot, SubjectState,
};

// =============================================================================
// Helpers
// =============================================================================

fn restore(subject: SubjectState, stacks: u32, draws: ScriptedSource) -> LifeEngine {
    let snapshot = StateSnapshot {
        subject,
        modifier_stacks: stacks,
        lives_archived: 0,
    };
    LifeEngine::from_parts(EngineConfig::default(), snapshot, draws).unwrap()
}

fn deaths_in_journal(engine: &LifeEngine) -> usize {
    engine
        .journal()
        .entries()
        .iter()
        .filter(|note| matches!(note.key, EventKey::Death(_)))
        .count()
}

fn snapshot_bytes(engine: &LifeEngine) -> Vec<u8> {
    serde_json::to_vec(&engine.snapshot()).unwrap()
}

// =============================================================================
// Cohorts
// =============================================================================

#[test]
fn cohort_counts_and_watermarks_hold_every_tick() {
    for seed in 0..20 {
        let mut engine = LifeEngine::new(EngineConfig::default(), SeededSource::new(seed));
        let mut turn: u32 = 0;
        while engine.is_alive() && turn < 200 {
            let action = match turn % 4 {
                0 => Action::AddHusband,
                1 | 2 => Action::Reproduce,
                _ => Action::Wait,
            };
            engine.perform(action);
            for cohort in &engine.subject().cohorts {
                assert!(cohort.dead <= cohort.size, "seed {seed}: dead > size");
                assert!(cohort.dead_females <= cohort.females);
                assert!(cohort.last_year_rolled <= cohort.age_years());
            }
            turn = turn.saturating_add(1);
        }
    }
}

// =============================================================================
// One death per tick
// =============================================================================

#[test]
fn forced_lethal_ambient_kills_exactly_once() {
    let mut config = EngineConfig::default();
    config.mortality.annual_civilian_rate = 1.0;
    for seed in 0..100_000_u64 {
        let mut engine = LifeEngine::new(config.clone(), SeededSource::new(seed));
        engine.wait();
        assert!(!engine.is_alive());
        assert_eq!(deaths_in_journal(&engine), 1, "seed {seed}");
        // A dead subject cannot tick again.
        engine.wait();
        assert_eq!(deaths_in_journal(&engine), 1);
        assert_eq!(engine.session().lives_archived(), 1);
    }
}

#[test]
fn every_lethal_check_firing_still_records_one_death() {
    let config = EngineConfig::default();
    let mut subject = fresh_subject(&config, 1);
    subject.outlander = true;
    subject.union.created = true;
    subject.union.size = 5_000;
    subject.rat_hunter = true;
    subject.hunter_notoriety = 100;
    subject.age = 90.0;

    // Draws of zero pass every gate, lethal or not.
    let mut engine = restore(subject, 0, ScriptedSource::constant(0.0));
    engine.wait();
    assert!(!engine.is_alive());
    assert_eq!(deaths_in_journal(&engine), 1);
    // The ambient draw comes first; the accident heads the pool.
    assert_eq!(engine.subject().cause_of_death, Some(DeathCause::Accident));
    // Nothing after the death ran: the union was never purged.
    assert_eq!(engine.subject().union.size, 5_000);
}

// =============================================================================
// Factions
// =============================================================================

#[test]
fn faction_size_stays_within_bounds() {
    let config = EngineConfig::default();
    for seed in 0..10 {
        let mut subject = fresh_subject(&config, 1);
        subject.outlander = true;
        let snapshot = StateSnapshot {
            subject,
            modifier_stacks: 0,
            lives_archived: 0,
        };
        let mut engine =
            LifeEngine::from_parts(config.clone(), snapshot, SeededSource::new(seed)).unwrap();
        engine.create_union();
        let mut turn: u32 = 0;
        while engine.is_alive() && turn < 300 {
            let before = engine.journal().len();
            let action = match turn % 5 {
                0 => Action::BuildCache,
                4 => Action::Revolt,
                _ => Action::ExpandUnion,
            };
            engine.perform(action);
            let union = &engine.subject().union;
            assert!(union.size <= config.faction.capacity);
            let purged = engine.journal().entries()[before..]
                .iter()
                .any(|n| n.key == EventKey::Faction(FactionKind::Union, FactionEvent::Purged));
            if purged {
                assert!(union.size <= cache_quota(union, &config.faction));
            }
            turn = turn.saturating_add(1);
        }
    }
}

#[test]
fn uprising_chance_is_monotone_in_size_and_stacks() {
    let config = EngineConfig::default().faction;
    let mut last = 0.0;
    for size in config.uprising_threshold..=config.capacity {
        let p = uprising_chance(size, 0, &config);
        assert!(p >= last, "size {size}");
        last = p;
    }
    for size in [1_000, 4_000, 10_000] {
        let mut last = 0.0;
        for stacks in 0..100 {
            let p = uprising_chance(size, stacks, &config);
            assert!(p >= last);
            last = p;
        }
    }
}

#[test]
fn revolt_unlocks_at_threshold_with_base_rate() {
    let config = EngineConfig::default();
    let mut subject = fresh_subject(&config, 1);
    subject.outlander = true;
    subject.union.created = true;
    subject.union.size = 999;

    let engine = restore(subject.clone(), 0, ScriptedSource::constant(0.99));
    assert!(!engine.can_perform(Action::Revolt));

    subject.union.size = 1_000;
    let engine = restore(subject, 0, ScriptedSource::constant(0.99));
    assert!(engine.can_perform(Action::Revolt));
    let p = uprising_chance(1_000, 0, &engine.config().faction);
    assert!((p - config.faction.uprising_base).abs() < 1e-12);
}

// =============================================================================
// Idempotence
// =============================================================================

#[test]
fn refused_actions_leave_state_untouched() {
    let config = EngineConfig::default();

    // A dead subject refuses everything.
    let mut engine = LifeEngine::new(config.clone(), ScriptedSource::constant(0.5));
    engine.die(DeathCause::Fever);
    let bytes = snapshot_bytes(&engine);
    let notes = engine.journal().len();
    for action in Action::ALL {
        assert!(!engine.can_perform(action));
        engine.perform(action);
        assert_eq!(snapshot_bytes(&engine), bytes, "{action} changed state");
        assert_eq!(engine.journal().len(), notes, "{action} emitted");
    }

    // A living subject refuses the actions whose preconditions are false.
    let mut subject = fresh_subject(&config, 1);
    subject.outlander = true;
    subject.union.created = true;
    subject.union.size = 999;
    let mut engine = restore(subject, 0, ScriptedSource::constant(0.5));
    let bytes = snapshot_bytes(&engine);
    let notes = engine.journal().len();
    for action in Action::ALL {
        if engine.can_perform(action) {
            continue;
        }
        engine.perform(action);
        assert_eq!(snapshot_bytes(&engine), bytes, "{action} changed state");
        assert_eq!(engine.journal().len(), notes, "{action} emitted");
        assert!((engine.subject().age - 16.0).abs() < f64::EPSILON);
    }
}

// =============================================================================
// Tracks and the gala flow
// =============================================================================

#[test]
fn outlander_and_deployed_tracks_stay_exclusive() {
    for seed in 0..30 {
        let mut engine = LifeEngine::new(EngineConfig::default(), SeededSource::new(seed));
        let mut turn: u32 = 0;
        while engine.is_alive() && turn < 100 {
            let action = match turn % 3 {
                0 => Action::Deploy,
                1 => Action::JoinOutlanders,
                _ => Action::Wait,
            };
            engine.perform(action);
            let s = engine.subject();
            assert!(!(s.outlander && s.proven));
            assert!(!(s.outlander && s.deployed));
            turn = turn.saturating_add(1);
        }
    }
}

#[test]
fn gala_never_replays() {
    let config = EngineConfig::default();
    let mut subject = fresh_subject(&config, 1);
    subject.gala_stage = GalaStage::Done;
    subject.gala_outcome = Some(GalaOutcome::Them);
    let engine = restore(subject, 0, ScriptedSource::constant(0.99));
    assert!(!engine.can_perform(Action::AttendGala));
    assert!(!engine.can_perform(Action::FormLeague));
}
