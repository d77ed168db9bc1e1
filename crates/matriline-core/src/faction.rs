//! Faction subsystem shared by the union and the league.
//!
//! Both factions run the same mechanics on a [`FactionState`]: founding,
//! recruitment, caches, uprisings, purges down to the cache quota, hiding,
//! and the per-tick background of stealth failures and membership churn.
//! Membership stays within `[0, capacity]` through every operation.

use matriline_types::FactionState;
use tracing::debug;

use crate::config::FactionConfig;
use crate::random::RandomSource;

/// Set membership, clamped to capacity, tracking the peak.
fn set_size(faction: &mut FactionState, size: u32, config: &FactionConfig) {
    faction.size = size.min(config.capacity);
    faction.peak_size = faction.peak_size.max(faction.size);
}

/// Found the faction with its initial members.
pub fn found(faction: &mut FactionState, config: &FactionConfig) {
    faction.created = true;
    faction.hiding_active = false;
    faction.hidden_until_age = None;
    set_size(faction, config.founding_members, config);
}

/// Add recruits, clamped to capacity. Returns how many actually joined.
pub fn recruit(faction: &mut FactionState, recruits: u32, config: &FactionConfig) -> u32 {
    let before = faction.size;
    set_size(faction, before.saturating_add(recruits), config);
    faction.size.saturating_sub(before)
}

/// Add one cache or hideout.
pub fn build_cache(faction: &mut FactionState) {
    faction.caches = faction.caches.saturating_add(1);
}

/// Members the caches can save through a purge.
pub const fn cache_quota(faction: &FactionState, config: &FactionConfig) -> u32 {
    faction.caches.saturating_mul(config.per_cache_quota)
}

/// Whether membership has unlocked the revolt or purge.
pub const fn uprising_unlocked(faction: &FactionState, config: &FactionConfig) -> bool {
    faction.size >= config.uprising_threshold
}

/// Uprising success probability.
///
/// Zero below the threshold; from there it rises linearly from the base rate
/// to the ceiling at capacity, plus a bonus per modifier stack, clamped to
/// the configured maximum.
pub fn uprising_chance(size: u32, stacks: u32, config: &FactionConfig) -> f64 {
    if size < config.uprising_threshold {
        return 0.0;
    }
    let span = config.capacity.saturating_sub(config.uprising_threshold);
    let progress = if span == 0 {
        1.0
    } else {
        let over = size.min(config.capacity).saturating_sub(config.uprising_threshold);
        f64::from(over) / f64::from(span)
    };
    let linear = progress.mul_add(config.uprising_ceiling - config.uprising_base, config.uprising_base);
    f64::from(stacks)
        .mul_add(config.uprising_stack_bonus, linear)
        .clamp(0.0, config.uprising_max)
}

/// Cut membership down to what the caches can save. Returns the survivors.
pub fn purge(faction: &mut FactionState, config: &FactionConfig) -> u32 {
    faction.size = faction.size.min(cache_quota(faction, config));
    faction.size
}

/// Suspend the faction until the subject reaches `until_age`.
pub const fn hide(faction: &mut FactionState, until_age: f64) {
    faction.hiding_active = true;
    faction.hidden_until_age = Some(until_age);
}

/// Leave hiding once `age` reaches the recorded date. Returns whether the
/// faction resurfaced.
pub fn resurface_if_due(faction: &mut FactionState, age: f64) -> bool {
    if !faction.hiding_active {
        return false;
    }
    let due = faction.hidden_until_age.is_none_or(|until| age >= until);
    if due {
        faction.hiding_active = false;
        faction.hidden_until_age = None;
    }
    due
}

/// Record the first time membership reaches capacity. Returns `true` once.
pub const fn mark_capacity(faction: &mut FactionState, config: &FactionConfig) -> bool {
    if faction.size >= config.capacity && !faction.capacity_reached {
        faction.capacity_reached = true;
        return true;
    }
    false
}

// ---------------------------------------------------------------------------
// Background tick
// ---------------------------------------------------------------------------

/// Result of one background tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    /// Not founded, empty, or hiding: nothing happened.
    Idle,
    /// The faction was discovered. The caller purges, hides and rolls the
    /// uncovered chance.
    StealthFailure,
    /// Membership churned.
    Churned {
        /// Members removed.
        removed: u32,
        /// Members recruited.
        recruited: u32,
    },
}

/// Stealth failure probability per tick for the current membership.
pub fn stealth_failure_chance(size: u32, config: &FactionConfig) -> f64 {
    f64::from(size)
        .mul_add(config.stealth_failure_per_member, config.stealth_failure_base)
        .clamp(0.0, 1.0)
}

/// Run one background tick.
///
/// A single stealth draw comes first. Without a failure, churn runs up to
/// `churn_trial_cap` per-member trials, each one draw split into removal,
/// recruitment or nothing. When membership exceeds the cap, the sampled
/// counts are scaled up to the full membership.
pub fn background_tick(
    faction: &mut FactionState,
    config: &FactionConfig,
    rng: &mut dyn RandomSource,
) -> Background {
    if !faction.is_operational() || faction.size == 0 {
        return Background::Idle;
    }
    if rng.chance(stealth_failure_chance(faction.size, config)) {
        return Background::StealthFailure;
    }

    let trials = faction.size.min(config.churn_trial_cap);
    let mut removed: u32 = 0;
    let mut recruited: u32 = 0;
    for _ in 0..trials {
        let u = rng.next_f64();
        if u < config.removal_rate {
            removed = removed.saturating_add(1);
        } else if u < config.removal_rate + config.recruit_rate {
            recruited = recruited.saturating_add(1);
        }
    }
    if trials < faction.size {
        let scale = f64::from(faction.size) / f64::from(trials.max(1));
        removed = scale_count(removed, scale);
        recruited = scale_count(recruited, scale);
    }

    let size = faction
        .size
        .saturating_sub(removed)
        .saturating_add(recruited);
    set_size(faction, size, config);
    debug!(faction = %faction.kind, removed, recruited, size = faction.size, "faction churn");
    Background::Churned { removed, recruited }
}

fn scale_count(count: u32, scale: f64) -> u32 {
    let scaled = (f64::from(count) * scale).round();
    if scaled >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let whole = scaled.max(0.0) as u32;
        whole
    }
}

#[cfg(test)]
mod tests {
    use matriline_types::FactionKind;

    use super::*;
    use crate::random::{ScriptedSource, SeededSource};

    fn founded(size: u32) -> FactionState {
        let mut f = FactionState::new(FactionKind::Union);
        f.created = true;
        f.size = size;
        f.peak_size = size;
        f
    }

    #[test]
    fn recruit_clamps_to_capacity() {
        let config = FactionConfig::default();
        let mut f = founded(9_990);
        assert_eq!(recruit(&mut f, 50, &config), 10);
        assert_eq!(f.size, 10_000);
        assert!(mark_capacity(&mut f, &config));
        assert!(!mark_capacity(&mut f, &config));
    }

    #[test]
    fn uprising_base_rate_at_threshold() {
        let config = FactionConfig::default();
        assert!(uprising_chance(999, 0, &config).abs() < f64::EPSILON);
        assert!((uprising_chance(1_000, 0, &config) - 0.10).abs() < 1e-12);
        assert!((uprising_chance(10_000, 0, &config) - 0.95).abs() < 1e-12);
        assert!((uprising_chance(10_000, 50, &config) - 0.99).abs() < 1e-12);
    }

    #[test]
    fn uprising_is_monotone() {
        let config = FactionConfig::default();
        let mut previous = 0.0;
        for size in (1_000..=10_000).step_by(250) {
            let p = uprising_chance(size, 0, &config);
            assert!(p >= previous);
            previous = p;
        }
        let mut previous = 0.0;
        for stacks in 0..60 {
            let p = uprising_chance(5_000, stacks, &config);
            assert!(p >= previous);
            previous = p;
        }
    }

    #[test]
    fn purge_keeps_cache_quota() {
        let config = FactionConfig::default();
        let mut f = founded(800);
        f.caches = 3;
        assert_eq!(purge(&mut f, &config), 150);
        let mut small = founded(40);
        small.caches = 3;
        assert_eq!(purge(&mut small, &config), 40);
        let mut bare = founded(500);
        assert_eq!(purge(&mut bare, &config), 0);
    }

    #[test]
    fn hiding_suspends_background_until_due() {
        let config = FactionConfig::default();
        let mut f = founded(100);
        hide(&mut f, 20.0);
        let mut rng = ScriptedSource::constant(0.0);
        assert_eq!(background_tick(&mut f, &config, &mut rng), Background::Idle);
        assert!(!resurface_if_due(&mut f, 19.5));
        assert!(resurface_if_due(&mut f, 20.0));
        assert!(f.hidden_until_age.is_none());
    }

    #[test]
    fn stealth_failure_on_low_draw() {
        let config = FactionConfig::default();
        let mut f = founded(100);
        let mut rng = ScriptedSource::constant(0.0);
        assert_eq!(background_tick(&mut f, &config, &mut rng), Background::StealthFailure);
    }

    #[test]
    fn churn_splits_each_draw() {
        let config = FactionConfig::default();
        let mut f = founded(3);
        // stealth miss, then removal, recruit, nothing
        let mut rng = ScriptedSource::new([0.9, 0.005, 0.02, 0.5], 0.5);
        let outcome = background_tick(&mut f, &config, &mut rng);
        assert_eq!(outcome, Background::Churned { removed: 1, recruited: 1 });
        assert_eq!(f.size, 3);
    }

    #[test]
    fn churn_stays_in_bounds() {
        let config = FactionConfig::default();
        let mut f = founded(9_900);
        let mut rng = SeededSource::new(11);
        for _ in 0..200 {
            let _ = background_tick(&mut f, &config, &mut rng);
            assert!(f.size <= config.capacity);
        }
    }
}
