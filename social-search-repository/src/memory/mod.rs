//! In-memory implementations of the host collaborators.
//!
//! Used by tests and by local runs of the agent without an OpenSearch cluster.

mod configuration;
mod index;
mod store;

pub use configuration::JsonConfigurationProvider;
pub use index::{InMemorySearchIndex, InMemorySearchSession};
pub use store::{InMemoryPartitionStore, PartitionSnapshot};
