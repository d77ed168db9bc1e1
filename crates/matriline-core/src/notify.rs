//! Notification delivery: the per-life journal and external sinks.

use matriline_types::{EventKey, Notification};

/// Receives every notification the engine emits, in order.
pub trait NotificationSink: Send {
    /// Called once per notification.
    fn notify(&mut self, note: &Notification);
}

/// A sink that discards everything.
pub struct NoOpSink;

impl NotificationSink for NoOpSink {
    fn notify(&mut self, _note: &Notification) {}
}

impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, note: &Notification) {
        self.push(note.clone());
    }
}

/// In-memory record of the current life's notifications.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Journal {
    entries: Vec<Notification>,
}

impl Journal {
    /// Empty journal.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a notification.
    pub fn record(&mut self, note: Notification) {
        self.entries.push(note);
    }

    /// Every notification of the current life, oldest first.
    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    /// Most recent notification.
    pub fn last(&self) -> Option<&Notification> {
        self.entries.last()
    }

    /// Number of notifications recorded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any notification carries `key`.
    pub fn contains(&self, key: EventKey) -> bool {
        self.entries.iter().any(|note| note.key == key)
    }

    /// How many notifications carry `key`.
    pub fn count(&self, key: EventKey) -> usize {
        self.entries.iter().filter(|note| note.key == key).count()
    }

    /// Milestone notifications, for the archived life summary.
    pub fn notable(&self) -> Vec<Notification> {
        self.entries
            .iter()
            .filter(|note| note.key.is_notable())
            .cloned()
            .collect()
    }

    /// Forget everything (on reset).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use matriline_types::DeathCause;

    use super::*;

    fn note(key: EventKey) -> Notification {
        Notification {
            key,
            text: key.key(),
            age: 16.0,
        }
    }

    #[test]
    fn journal_records_in_order() {
        let mut journal = Journal::new();
        journal.record(note(EventKey::LifeBegun));
        journal.record(note(EventKey::TickPassed));
        journal.record(note(EventKey::TickPassed));
        assert_eq!(journal.len(), 3);
        assert_eq!(journal.count(EventKey::TickPassed), 2);
        assert_eq!(journal.last().map(|n| n.key), Some(EventKey::TickPassed));
    }

    #[test]
    fn journal_notable_filters_milestones() {
        let mut journal = Journal::new();
        journal.record(note(EventKey::TickPassed));
        journal.record(note(EventKey::Proven));
        journal.record(note(EventKey::Death(DeathCause::Fever)));
        let notable = journal.notable();
        assert_eq!(notable.len(), 2);
        journal.clear();
        assert!(journal.is_empty());
    }

    #[test]
    fn vec_sink_collects() {
        let mut sink: Vec<Notification> = Vec::new();
        sink.notify(&note(EventKey::Litter));
        assert_eq!(sink.len(), 1);
    }
}
