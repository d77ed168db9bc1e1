//! One-shot effects an action hands to the tick that follows it.

use matriline_types::EventKey;

/// Transient flags consumed by the final step of the next full tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickEffects {
    /// Flavor to emit instead of the default half-year line.
    pub flavor_override: Option<EventKey>,
    /// Emit no flavor line at all.
    pub suppress_pass_flavor: bool,
}

impl TickEffects {
    /// Effects that replace the flavor line with `key`.
    pub const fn flavor(key: EventKey) -> Self {
        Self {
            flavor_override: Some(key),
            suppress_pass_flavor: false,
        }
    }

    /// Effects that silence the flavor line.
    pub const fn quiet() -> Self {
        Self {
            flavor_override: None,
            suppress_pass_flavor: true,
        }
    }

    /// Take the effects, leaving the defaults behind.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// The flavor key to emit, if any.
    ///
    /// An override wins over suppression; with neither, the default
    /// half-year line.
    pub const fn flavor_key(self) -> Option<EventKey> {
        match (self.flavor_override, self.suppress_pass_flavor) {
            (Some(key), _) => Some(key),
            (None, true) => None,
            (None, false) => Some(EventKey::TickPassed),
        }
    }
}
