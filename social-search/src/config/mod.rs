//! Configuration and dependency initialization for the agent.

mod dependencies;

pub use dependencies::{parse_account_ids, ConnectionMode, Dependencies};
