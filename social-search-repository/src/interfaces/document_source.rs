//! Document source trait definition.

use async_trait::async_trait;
use social_search_shared::SearchDocument;

use crate::errors::SocialSearchError;
use crate::types::ItemUri;

/// Read side of a crawler: builds the current search document of one entity.
///
/// Index backends call this when an entity is re-indexed. `Ok(None)` means the entity no
/// longer exists and its document must be removed.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn document(&self, uri: &ItemUri) -> Result<Option<SearchDocument>, SocialSearchError>;
}
