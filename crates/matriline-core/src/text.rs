//! Text lookup and notification rendering via `minijinja`.
//!
//! The engine emits an [`EventKey`] plus [`Params`]. The text comes from a
//! [`TextLookup`] (usually a YAML [`TextTable`]), falls back to the key's
//! built-in template when the lookup has nothing or fails to render, and
//! finally to the raw dotted key.

use std::collections::BTreeMap;
use std::path::Path;

use matriline_types::EventKey;
use minijinja::{Environment, Value};
use tracing::warn;

use crate::error::EngineError;

/// Capability that maps a notification key to a text template.
pub trait TextLookup {
    /// Template for `key`, or `None` when the lookup has no text for it.
    fn lookup(&self, key: EventKey) -> Option<String>;
}

/// A lookup with no entries; every notification uses its fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoText;

impl TextLookup for NoText {
    fn lookup(&self, _key: EventKey) -> Option<String> {
        None
    }
}

/// Text templates keyed by dotted notification key (`reproduce.litter`).
///
/// Empty strings count as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextTable {
    entries: BTreeMap<String, String>,
}

impl TextTable {
    /// Load a table from a YAML map of `key: template`.
    pub fn from_file(path: &Path) -> Result<Self, EngineError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse a table from a YAML map of `key: template`.
    pub fn parse(yaml: &str) -> Result<Self, EngineError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let entries: BTreeMap<String, String> =
            serde_yml::from_str(yaml).map_err(|source| EngineError::TextYaml { source })?;
        Ok(Self { entries })
    }

    /// Add or replace a template.
    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.entries.insert(key.into(), template.into());
    }

    /// Number of templates in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no templates.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TextLookup for TextTable {
    fn lookup(&self, key: EventKey) -> Option<String> {
        self.entries
            .get(&key.key())
            .filter(|text| !text.trim().is_empty())
            .cloned()
    }
}

/// Named values available to a template.
#[derive(Debug, Clone, Default)]
pub struct Params(BTreeMap<&'static str, Value>);

impl Params {
    /// No parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter.
    #[must_use]
    pub fn with(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.0.insert(name, value.into());
        self
    }
}

/// Renders notification templates.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// Renderer with a default environment.
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    /// Resolve the final text for `key`.
    ///
    /// Tries the lookup's template, then the key's fallback template, then
    /// the raw dotted key.
    pub fn resolve(&self, lookup: &dyn TextLookup, key: EventKey, params: &Params) -> String {
        if let Some(template) = lookup.lookup(key) {
            match self.env.render_str(&template, &params.0) {
                Ok(text) => return text,
                Err(e) => {
                    warn!(key = %key, error = %e, "text template failed to render, using fallback");
                }
            }
        }
        match self.env.render_str(&key.fallback(), &params.0) {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => key.key(),
            Err(e) => {
                warn!(key = %key, error = %e, "fallback template failed to render");
                key.key()
            }
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use matriline_types::{DeathCause, FactionEvent, FactionKind};

    use super::*;

    #[test]
    fn fallback_renders_params() {
        let renderer = Renderer::new();
        let params = Params::new()
            .with("count", 4_u32)
            .with("daughters", 2_u32)
            .with("survivors", 3_u32);
        let text = renderer.resolve(&NoText, EventKey::Litter, &params);
        assert_eq!(text, "You bear a litter of 4 (2 daughters); 3 survive infancy.");
    }

    #[test]
    fn table_overrides_fallback() {
        let mut table = TextTable::default();
        table.insert("reproduce.need_husband", "No husband, no litter.");
        let text = Renderer::new().resolve(&table, EventKey::NeedHusband, &Params::new());
        assert_eq!(text, "No husband, no litter.");
    }

    #[test]
    fn empty_entry_counts_as_missing() {
        let mut table = TextTable::default();
        table.insert("tick.pass", "   ");
        let text = Renderer::new().resolve(&table, EventKey::TickPassed, &Params::new());
        assert_eq!(text, "Half a year passes.");
    }

    #[test]
    fn broken_template_falls_back() {
        let mut table = TextTable::default();
        table.insert("duel.won", "{{ wins ");
        let params = Params::new().with("wins", 2_u32);
        let text = Renderer::new().resolve(&table, EventKey::DuelWon, &params);
        assert_eq!(text, "You win the duel. Duels won: 2.");
    }

    #[test]
    fn parse_yaml_table() {
        let yaml = "union.founded: \"The union is born.\"\ndeath.old_age: \"Peacefully.\"\n";
        let table = TextTable::parse(yaml).ok().unwrap_or_default();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.lookup(EventKey::Faction(FactionKind::Union, FactionEvent::Founded)),
            Some("The union is born.".to_owned())
        );
        assert_eq!(
            table.lookup(EventKey::Death(DeathCause::OldAge)),
            Some("Peacefully.".to_owned())
        );
        assert_eq!(table.lookup(EventKey::TickPassed), None);
    }

    #[test]
    fn parse_rejects_non_map() {
        assert!(TextTable::parse("- a\n- b\n").is_err());
    }
}
