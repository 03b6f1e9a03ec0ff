//! Index registry trait definition.

use std::sync::Arc;

use crate::errors::SocialSearchError;
use crate::interfaces::SearchIndex;
use crate::types::StoredItem;

/// Registry of every search index known to the host.
pub trait IndexRegistry: Send + Sync {
    /// All registered indexes. Empty while the host has not initialized indexing.
    fn indexes(&self) -> Vec<Arc<dyn SearchIndex>>;

    /// The index responsible for `item`.
    ///
    /// # Returns
    ///
    /// * `Ok(index)` - The index whose crawlers cover the item
    /// * `Err(SocialSearchError::IndexNotFound)` - If no index covers the item
    fn index_for(&self, item: &StoredItem) -> Result<Arc<dyn SearchIndex>, SocialSearchError>;
}
