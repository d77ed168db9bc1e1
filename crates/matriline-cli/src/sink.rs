//! Notification sink that prints to stdout.

use matriline_core::NotificationSink;
use matriline_types::Notification;

/// Prints each notification on its own line, prefixed with the age.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl NotificationSink for StdoutSink {
    fn notify(&mut self, note: &Notification) {
        println!("[{:>5.1}] {}", note.age, note.text);
    }
}
