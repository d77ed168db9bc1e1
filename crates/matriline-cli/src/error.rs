//! Error types for the Matriline binary.
//!
//! [`CliError`] wraps every failure mode of startup so `main` can propagate
//! with `?`. Once the engine is built nothing else can fail.

/// Top-level error for the Matriline binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: matriline_core::ConfigError,
    },

    /// Loading the text table failed.
    #[error("engine error: {source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: matriline_core::EngineError,
    },

    /// An environment variable held a value that does not parse.
    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv {
        /// Name of the variable.
        name: &'static str,
        /// The raw value found.
        value: String,
    },
}
