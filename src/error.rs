//! Error types for configuration and console commands.
//!
//! The store itself never fails: a missing knob is `None`. These errors only
//! come from the layers around it.

/// Errors raised outside the store.
#[derive(Debug, thiserror::Error)]
pub enum KnobsError {
    /// A console command could not be parsed.
    #[error("Invalid command: {0}")]
    Command(String),

    /// A knob value was not valid JSON.
    #[error("Invalid knob value: {0}")]
    Value(#[from] serde_json::Error),

    /// The configuration is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),
}
