//! Request and value types shared by the collaborator traits and the service.

use std::fmt;

use serde::{Deserialize, Serialize};
use social_search_shared::Identifier;

/// Visibility applied to a partition store read.
///
/// `System` reads bypass the access-control filtering applied to end-user reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    User,
    System,
}

/// Security behavior of a search session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecurityOptions {
    /// Filter results by the caller's permissions.
    #[default]
    EnableSecurityCheck,
    /// Return every matching document regardless of permissions.
    DisableSecurityCheck,
}

/// How a single-entity index update is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexingOptions {
    /// Let the backend batch the update.
    #[default]
    Default,
    /// Re-index synchronously, bypassing any batching or queue.
    ForcedIndexing,
}

/// Which identifier a query returns for each matching document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    /// The document's own item id.
    #[default]
    ItemId,
    /// The item id of the document's parent. Documents without a parent are skipped.
    Parent,
}

/// Unique identity of an entity across partitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemUri {
    pub item_id: Identifier,
    pub partition: String,
}

impl ItemUri {
    pub fn new(item_id: Identifier, partition: impl Into<String>) -> Self {
        Self {
            item_id,
            partition: partition.into(),
        }
    }

    /// Document id used by index backends: `{item_id}_{partition}`.
    pub fn document_id(&self) -> String {
        format!("{}_{}", self.item_id, self.partition)
    }
}

impl fmt::Display for ItemUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.partition, self.item_id)
    }
}

/// An entity read from the partition data store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredItem {
    pub id: Identifier,
    /// Full path of the item, e.g. `/social/messages/spring/launch`.
    pub path: String,
    /// Partition the item lives in. Filled in by the store.
    #[serde(default)]
    pub partition: String,
    pub template_id: Identifier,
    /// Templates `template_id` inherits from, nearest first.
    #[serde(default)]
    pub base_template_ids: Vec<Identifier>,
    #[serde(default)]
    pub parent_id: Option<Identifier>,
    /// Hidden from `AccessMode::User` reads.
    #[serde(default)]
    pub restricted: bool,
}

impl StoredItem {
    /// Returns true if the item's template is `template_id` or inherits from it.
    pub fn is_of_schema(&self, template_id: &Identifier) -> bool {
        self.template_id == *template_id || self.base_template_ids.contains(template_id)
    }

    pub fn uri(&self) -> ItemUri {
        ItemUri::new(self.id, self.partition.clone())
    }
}

/// A crawler feeding an index.
///
/// Crawlers that read from a partition are bound to it; other crawlers (external
/// sources) carry no partition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Crawler {
    #[serde(default)]
    pub partition: Option<String>,
    /// Root path the crawler indexes from. `None` crawls the whole partition.
    #[serde(default)]
    pub root: Option<String>,
}

impl Crawler {
    pub fn for_partition(partition: impl Into<String>, root: Option<String>) -> Self {
        Self {
            partition: Some(partition.into()),
            root,
        }
    }

    /// Returns true if this crawler indexes `item`.
    ///
    /// Path comparison is case-insensitive and respects segment boundaries.
    pub fn covers(&self, item: &StoredItem) -> bool {
        if self.partition.as_deref() != Some(item.partition.as_str()) {
            return false;
        }

        match &self.root {
            None => true,
            Some(root) => {
                let root = root.trim_end_matches('/').to_lowercase();
                let path = item.path.to_lowercase();
                path == root || path.starts_with(&format!("{}/", root))
            }
        }
    }
}
