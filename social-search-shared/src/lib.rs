//! # Social Search Shared
//!
//! This crate defines the data structures shared across the social search workspace:
//! entity identifiers, the flattened document stored in the search index, and the
//! configuration sections that drive template filtering and index resolution.

pub mod types;

pub use types::configuration::{
    ConfigurationSection, MessageSettings, NetworkSettings, NetworksConfiguration,
    PostingConfigurationSettings, PostingConfigurationsConfiguration, SettingsConfiguration,
};
pub use types::container::normalize_container;
pub use types::identifier::Identifier;
pub use types::search_document::{unposted_date, FieldValue, SearchDocument, SearchField};
