//! Session-scoped context shared by every life in one play session.
//!
//! The modifier stacks only ever grow. The archive keeps one
//! [`LifeSummary`] per finished or abandoned life. Both survive rebirth; a
//! session ends when its owner drops it.

use matriline_types::LifeSummary;
use tracing::info;

/// State that outlives individual subjects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    modifier_stacks: u32,
    archive: Vec<LifeSummary>,
    lives_started: u32,
}

impl Session {
    /// Fresh session with no stacks and an empty archive.
    pub const fn new() -> Self {
        Self {
            modifier_stacks: 0,
            archive: Vec::new(),
            lives_started: 0,
        }
    }

    /// Session resumed with pre-existing stacks (e.g. restored from a save).
    pub const fn with_stacks(modifier_stacks: u32) -> Self {
        Self {
            modifier_stacks,
            archive: Vec::new(),
            lives_started: 0,
        }
    }

    /// Accumulated systemic-advantage stacks.
    pub const fn modifier_stacks(&self) -> u32 {
        self.modifier_stacks
    }

    /// Add one stack after a successful uprising. Returns the new total.
    pub fn gain_stack(&mut self) -> u32 {
        self.modifier_stacks = self.modifier_stacks.saturating_add(1);
        info!(stacks = self.modifier_stacks, "modifier stack gained");
        self.modifier_stacks
    }

    /// Raise the stack count to at least `stacks`. Stacks never drop.
    pub fn raise_stacks_to(&mut self, stacks: u32) {
        self.modifier_stacks = self.modifier_stacks.max(stacks);
    }

    /// Archived lives, oldest first.
    pub fn archive(&self) -> &[LifeSummary] {
        &self.archive
    }

    /// Number of archived lives.
    pub fn lives_archived(&self) -> u32 {
        u32::try_from(self.archive.len()).unwrap_or(u32::MAX)
    }

    /// Store a finished life.
    pub fn archive_life(&mut self, summary: LifeSummary) {
        self.archive.push(summary);
    }

    /// Begin a new life and return its 1-based number.
    pub fn next_life(&mut self) -> u32 {
        self.lives_started = self.lives_started.saturating_add(1);
        self.lives_started
    }

    /// Lives started in this session.
    pub const fn lives_started(&self) -> u32 {
        self.lives_started
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacks_only_grow() {
        let mut session = Session::new();
        assert_eq!(session.modifier_stacks(), 0);
        assert_eq!(session.gain_stack(), 1);
        assert_eq!(session.gain_stack(), 2);
        assert_eq!(Session::with_stacks(u32::MAX).gain_stack(), u32::MAX);
    }

    #[test]
    fn raising_stacks_keeps_the_rest_of_the_session() {
        let mut session = Session::new();
        let _ = session.next_life();
        let _ = session.next_life();
        session.raise_stacks_to(4);
        assert_eq!(session.modifier_stacks(), 4);
        session.raise_stacks_to(1);
        assert_eq!(session.modifier_stacks(), 4);
        assert_eq!(session.lives_started(), 2);
    }

    #[test]
    fn life_numbers_are_one_based() {
        let mut session = Session::new();
        assert_eq!(session.next_life(), 1);
        assert_eq!(session.next_life(), 2);
        assert_eq!(session.lives_started(), 2);
        assert_eq!(session.lives_archived(), 0);
    }
}
