//! Life simulation engine for Matriline.
//!
//! A single subject advances in half-year ticks. Each tick resolves husband
//! attrition, one ambient mortality draw, offspring cohorts, two faction
//! sub-economies and the rat-hunter annihilation check, with at most one
//! death per tick. The engine never renders prose itself: it emits semantic
//! keys, resolves text through a lookup, and forwards the result to a sink.
//!
//! # Modules
//!
//! - [`config`] -- Validated configuration ([`EngineConfig`])
//! - [`engine`] -- The life controller and action API ([`LifeEngine`])
//! - [`cohort`] -- Births, yearly child mortality, coming of age
//! - [`faction`] -- Union and league mechanics
//! - [`gala`] -- Gala event flow
//! - [`mortality`] -- Ambient risk, the cause pool, action risks
//! - [`random`] -- Uniform draws ([`RandomSource`])
//! - [`text`] -- Text lookup and rendering ([`TextLookup`], [`TextTable`])
//! - [`notify`] -- Journal and notification sinks
//! - [`session`] -- Session-scoped modifier stacks and archive
//! - [`effects`] -- One-shot tick effects
//! - [`subject`] -- Subject construction and derived values
//! - [`error`] -- Error types ([`EngineError`])

pub mod cohort;
pub mod config;
pub mod effects;
pub mod engine;
pub mod error;
pub mod faction;
pub mod gala;
pub mod mortality;
pub mod notify;
pub mod random;
pub mod session;
pub mod subject;
pub mod text;

// Re-export primary types at crate root for convenience.
pub use config::{ConfigError, EngineConfig};
pub use effects::TickEffects;
pub use engine::{EngineBuilder, LifeEngine};
pub use error::EngineError;
pub use notify::{Journal, NoOpSink, NotificationSink};
pub use random::{RandomSource, ScriptedSource, SeededSource};
pub use session::Session;
pub use text::{NoText, Params, Renderer, TextLookup, TextTable};
