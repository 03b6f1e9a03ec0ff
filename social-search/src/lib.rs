//! # Social Search
//!
//! Auto-posting agent for social messages - periodically asks the social search index
//! which messages are ready to be posted automatically.
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`agent`]: The periodic auto-posting loop
//! - [`errors`]: Error types for the agent

pub mod agent;
pub mod config;
pub mod errors;

pub use agent::{AgentConfig, AutoPostingAgent};
pub use config::Dependencies;
pub use errors::AgentError;

use thiserror::Error;

/// Errors that can occur during agent initialization or execution.
#[derive(Error, Debug)]
pub enum StartupError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Agent error.
    #[error("Agent error: {0}")]
    AgentError(#[from] AgentError),
}

impl StartupError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
