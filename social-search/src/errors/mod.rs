//! Error types for the auto-posting agent.

use social_search_repository::SocialSearchError;
use thiserror::Error;

/// Errors that can occur while the agent runs.
#[derive(Error, Debug)]
pub enum AgentError {
    /// Error from the social search service.
    #[error("Search error: {0}")]
    SearchError(#[from] SocialSearchError),
}

impl AgentError {
    /// Whether the agent cannot recover from this error without a configuration change.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::SearchError(e) => e.is_configuration(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_fatal() {
        assert!(AgentError::from(SocialSearchError::configuration("missing")).is_fatal());
        assert!(!AgentError::from(SocialSearchError::query("timeout")).is_fatal());
    }
}
