//! OpenSearch implementation of the messages search index.
//!
//! This module provides a concrete `SearchIndex` backed by an OpenSearch cluster.
//! Predicates are translated into the query DSL and documents are (re)indexed from a
//! `DocumentSource`.

mod index;
mod index_config;
mod query;

pub use index::{OpenSearchIndex, OpenSearchSession};
pub use index_config::{get_index_settings, OpenSearchIndexConfig, DEFAULT_PAGE_SIZE};
pub use query::to_query_dsl;
