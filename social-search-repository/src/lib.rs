//! # Social Search Repository
//!
//! This crate provides the social messages query service and the traits it needs from
//! its host: configuration, the partition data store, the index registry and the search
//! indexes. It includes in-memory implementations of every collaborator and a concrete
//! search index for OpenSearch.

pub mod config;
pub mod errors;
pub mod filters;
pub mod interfaces;
pub mod memory;
pub mod opensearch;
pub mod registry;
pub mod resolver;
pub mod service;
pub mod types;

pub use config::SocialSearchServiceConfig;
pub use errors::SocialSearchError;
pub use filters::{Predicate, TemplateFilters};
pub use interfaces::{
    ConfigurationProvider, ConfigurationProviderExt, DocumentSource, IndexRegistry,
    PartitionStore, SearchIndex, SearchSession,
};
pub use opensearch::{OpenSearchIndex, OpenSearchIndexConfig};
pub use registry::{IndexSettings, IndexesConfiguration, StaticIndexRegistry};
pub use resolver::IndexResolver;
pub use service::SocialSearchService;
pub use types::{
    AccessMode, Crawler, IndexingOptions, ItemUri, Projection, SecurityOptions, StoredItem,
};
