//! In-memory partition store.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use social_search_shared::{Identifier, SearchDocument};
use tokio::sync::RwLock;

use crate::errors::SocialSearchError;
use crate::interfaces::{DocumentSource, PartitionStore};
use crate::types::{AccessMode, ItemUri, StoredItem};

/// Serialized content of a partition: its items and the search documents built from them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartitionSnapshot {
    pub partition: String,
    #[serde(default)]
    pub items: Vec<StoredItem>,
    #[serde(default)]
    pub documents: Vec<SearchDocument>,
}

impl PartitionSnapshot {
    /// Load a snapshot from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SocialSearchError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            SocialSearchError::store(format!(
                "Failed to read partition snapshot {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&json).map_err(|e| {
            SocialSearchError::parse(format!(
                "Invalid partition snapshot {}: {}",
                path.display(),
                e
            ))
        })
    }
}

/// Partition store holding items and their current search documents in memory.
///
/// It also acts as the [`DocumentSource`] of indexes crawling this partition: changing a
/// document here and re-indexing the item makes the change visible to queries.
pub struct InMemoryPartitionStore {
    partition: String,
    items: RwLock<Vec<StoredItem>>,
    documents: RwLock<HashMap<Identifier, SearchDocument>>,
}

impl InMemoryPartitionStore {
    /// Create an empty store for `partition`.
    pub fn new(partition: impl Into<String>) -> Self {
        Self::from_snapshot(PartitionSnapshot {
            partition: partition.into(),
            ..Default::default()
        })
    }

    pub fn from_snapshot(snapshot: PartitionSnapshot) -> Self {
        let partition = snapshot.partition;
        let items = snapshot
            .items
            .into_iter()
            .map(|item| StoredItem {
                partition: partition.clone(),
                ..item
            })
            .collect();
        let documents = snapshot
            .documents
            .into_iter()
            .map(|document| (document.item_id, document))
            .collect();

        Self {
            partition,
            items: RwLock::new(items),
            documents: RwLock::new(documents),
        }
    }

    /// Insert or replace an item.
    pub async fn insert_item(&self, item: StoredItem) {
        let item = StoredItem {
            partition: self.partition.clone(),
            ..item
        };
        let mut items = self.items.write().await;
        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
    }

    /// Insert or replace the search document of an item.
    pub async fn put_document(&self, document: SearchDocument) {
        self.documents
            .write()
            .await
            .insert(document.item_id, document);
    }

    pub async fn remove_document(&self, item_id: &Identifier) -> Option<SearchDocument> {
        self.documents.write().await.remove(item_id)
    }

    /// All search documents currently stored.
    pub async fn documents(&self) -> Vec<SearchDocument> {
        self.documents.read().await.values().cloned().collect()
    }

    fn visible(item: &StoredItem, access: AccessMode) -> bool {
        access == AccessMode::System || !item.restricted
    }
}

#[async_trait]
impl PartitionStore for InMemoryPartitionStore {
    fn partition(&self) -> &str {
        &self.partition
    }

    async fn item_by_path(
        &self,
        path: &str,
        access: AccessMode,
    ) -> Result<Option<StoredItem>, SocialSearchError> {
        let wanted = path.trim_end_matches('/').to_lowercase();
        let items = self.items.read().await;
        Ok(items
            .iter()
            .find(|item| item.path.trim_end_matches('/').to_lowercase() == wanted)
            .filter(|item| Self::visible(item, access))
            .cloned())
    }

    async fn item(
        &self,
        id: &Identifier,
        access: AccessMode,
    ) -> Result<Option<StoredItem>, SocialSearchError> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .find(|item| item.id == *id)
            .filter(|item| Self::visible(item, access))
            .cloned())
    }

    async fn children(
        &self,
        id: &Identifier,
        access: AccessMode,
    ) -> Result<Vec<StoredItem>, SocialSearchError> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .filter(|item| item.parent_id == Some(*id) && Self::visible(item, access))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DocumentSource for InMemoryPartitionStore {
    async fn document(&self, uri: &ItemUri) -> Result<Option<SearchDocument>, SocialSearchError> {
        if uri.partition != self.partition {
            return Err(SocialSearchError::store(format!(
                "Item {} does not belong to partition '{}'",
                uri, self.partition
            )));
        }
        Ok(self.documents.read().await.get(&uri.item_id).cloned())
    }
}
