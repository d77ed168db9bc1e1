//! Shared type definitions for the Matriline life simulation.
//!
//! This crate holds plain data: identifiers, enumerations, state structs and
//! notification keys. The engine in `matriline-core` owns all behavior.
//! Types flow to `TypeScript` via `ts-rs` for whatever presentation layer
//! consumes the notification feed.
//!
//! # Modules
//!
//! - [`ids`] -- Subject and cohort identifiers
//! - [`enums`] -- Tracks, birth paths, factions, gala stages, death causes, actions
//! - [`events`] -- Notification keys and rendered notifications
//! - [`structs`] -- Subject, cohort, faction, archive and snapshot structs

pub mod enums;
pub mod events;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Action, BirthPath, DeathCause, FactionKind, GalaOutcome, GalaStage, Track};
pub use events::{EventKey, FactionEvent, Notification};
pub use ids::{CohortId, SubjectId};
pub use structs::{
    Cohort, FactionState, HusbandRecord, LifeSummary, StateSnapshot, SubjectState,
};
