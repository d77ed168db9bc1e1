//! Error types for the matriline-core crate.
//!
//! Actions never fail: every adverse outcome is modeled inside the state
//! machine. Only construction, restoration and loading can return errors.

use crate::config::ConfigError;

/// Errors that can occur while building or restoring an engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A text table file could not be read.
    #[error("failed to read text table: {source}")]
    TextIo {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A text table file is not a valid YAML string map.
    #[error("failed to parse text table: {source}")]
    TextYaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A snapshot handed to the engine breaks a state invariant.
    #[error("invalid snapshot: {reason}")]
    InvalidSnapshot {
        /// Which invariant the snapshot breaks.
        reason: String,
    },
}
