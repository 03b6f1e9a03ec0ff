//! Partition data store trait definition.

use async_trait::async_trait;
use social_search_shared::Identifier;

use crate::errors::SocialSearchError;
use crate::types::{AccessMode, StoredItem};

/// Read access to the entities of one partition (database).
///
/// Items a `AccessMode::User` read may not see are reported as absent; `AccessMode::System`
/// reads see everything.
#[async_trait]
pub trait PartitionStore: Send + Sync {
    /// Name of the partition this store reads from.
    fn partition(&self) -> &str;

    /// Look up an item by its full path. Path comparison is case-insensitive.
    async fn item_by_path(
        &self,
        path: &str,
        access: AccessMode,
    ) -> Result<Option<StoredItem>, SocialSearchError>;

    /// Look up an item by id.
    async fn item(
        &self,
        id: &Identifier,
        access: AccessMode,
    ) -> Result<Option<StoredItem>, SocialSearchError>;

    /// Direct children of an item, in store order. Unknown items have no children.
    async fn children(
        &self,
        id: &Identifier,
        access: AccessMode,
    ) -> Result<Vec<StoredItem>, SocialSearchError>;
}
