//! Interface definitions for the collaborators of the social search service.
//!
//! The host platform supplies configuration, the partition data store, the index
//! registry and the indexes themselves. Each is an abstract trait so the service can be
//! wired against in-memory implementations, OpenSearch, or test mocks.

mod configuration_provider;
mod document_source;
mod index_registry;
mod partition_store;
mod search_index;

pub use configuration_provider::{ConfigurationProvider, ConfigurationProviderExt};
pub use document_source::DocumentSource;
pub use index_registry::IndexRegistry;
pub use partition_store::PartitionStore;
pub use search_index::{SearchIndex, SearchSession};
