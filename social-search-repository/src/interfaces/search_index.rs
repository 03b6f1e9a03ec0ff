//! Search index and session trait definitions.

use async_trait::async_trait;
use social_search_shared::SearchDocument;

use crate::errors::SocialSearchError;
use crate::filters::Predicate;
use crate::types::{Crawler, IndexingOptions, ItemUri, SecurityOptions};

/// A queryable search index.
///
/// Queries run inside a [`SearchSession`] opened per call; updates re-index a single
/// entity identified by its [`ItemUri`].
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// The configured index name.
    fn name(&self) -> &str;

    /// Crawlers feeding this index.
    fn crawlers(&self) -> &[Crawler];

    /// Open a search session.
    ///
    /// The session holds backend resources until it is dropped.
    async fn open_session(
        &self,
        security: SecurityOptions,
    ) -> Result<Box<dyn SearchSession>, SocialSearchError>;

    /// Re-index one entity.
    ///
    /// With `IndexingOptions::ForcedIndexing` the document is visible to queries when this
    /// returns.
    async fn update(
        &self,
        uri: &ItemUri,
        options: IndexingOptions,
    ) -> Result<(), SocialSearchError>;
}

/// A scoped query session against one index.
///
/// Implementations release their resources in `Drop`, so a session is released on every
/// exit path of the caller, including early returns and errors.
#[async_trait]
pub trait SearchSession: Send + Sync {
    /// Return every document matching `predicate`, fully materialized.
    async fn search(&self, predicate: &Predicate) -> Result<Vec<SearchDocument>, SocialSearchError>;
}
