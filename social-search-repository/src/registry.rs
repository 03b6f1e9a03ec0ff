//! Static index registry and the `indexes` configuration section.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use social_search_shared::ConfigurationSection;

use crate::errors::SocialSearchError;
use crate::interfaces::{IndexRegistry, SearchIndex};
use crate::types::{Crawler, StoredItem};

/// One registered index as declared in configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexSettings {
    pub name: String,
    #[serde(default)]
    pub crawlers: Vec<Crawler>,
}

/// The `indexes` configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct IndexesConfiguration {
    pub indexes: Vec<IndexSettings>,
}

impl ConfigurationSection for IndexesConfiguration {
    const SECTION: &'static str = "indexes";
}

/// Registry over a fixed list of indexes.
///
/// The index for an item is the first registered index with a crawler covering it
/// (same partition, item under the crawler root).
#[derive(Clone, Default)]
pub struct StaticIndexRegistry {
    indexes: Vec<Arc<dyn SearchIndex>>,
}

impl StaticIndexRegistry {
    pub fn new(indexes: Vec<Arc<dyn SearchIndex>>) -> Self {
        Self { indexes }
    }
}

impl IndexRegistry for StaticIndexRegistry {
    fn indexes(&self) -> Vec<Arc<dyn SearchIndex>> {
        self.indexes.clone()
    }

    fn index_for(&self, item: &StoredItem) -> Result<Arc<dyn SearchIndex>, SocialSearchError> {
        self.indexes
            .iter()
            .find(|index| index.crawlers().iter().any(|crawler| crawler.covers(item)))
            .cloned()
            .ok_or_else(|| {
                SocialSearchError::index_not_found(format!(
                    "No index crawls item '{}' in partition '{}'",
                    item.path, item.partition
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemoryPartitionStore, InMemorySearchIndex};
    use social_search_shared::Identifier;

    fn index(name: &str, crawlers: Vec<Crawler>) -> Arc<dyn SearchIndex> {
        Arc::new(InMemorySearchIndex::new(
            name,
            crawlers,
            Arc::new(InMemoryPartitionStore::new("master")),
        ))
    }

    fn item(path: &str) -> StoredItem {
        StoredItem {
            id: Identifier::new_v4(),
            path: path.to_string(),
            partition: "master".to_string(),
            template_id: Identifier::new_v4(),
            base_template_ids: vec![],
            parent_id: None,
            restricted: false,
        }
    }

    #[test]
    fn test_index_for_picks_first_covering_index() {
        let registry = StaticIndexRegistry::new(vec![
            index(
                "web_index",
                vec![Crawler::for_partition("web", None)],
            ),
            index(
                "social_messages_master",
                vec![Crawler::for_partition(
                    "master",
                    Some("/social/messages".to_string()),
                )],
            ),
            index("master_index", vec![Crawler::for_partition("master", None)]),
        ]);

        let found = registry.index_for(&item("/social/messages")).unwrap();
        assert_eq!(found.name(), "social_messages_master");

        let fallback = registry.index_for(&item("/content/home")).unwrap();
        assert_eq!(fallback.name(), "master_index");
    }

    #[test]
    fn test_index_for_without_covering_index() {
        let registry = StaticIndexRegistry::new(vec![index("external", vec![Crawler::default()])]);

        let err = registry.index_for(&item("/social/messages")).err().unwrap();
        assert!(matches!(err, SocialSearchError::IndexNotFound(_)));
    }

    #[test]
    fn test_indexes_section() {
        let config: IndexesConfiguration = serde_json::from_value(serde_json::json!([
            {"name": "social_messages_master", "crawlers": [{"partition": "master", "root": "/social/messages"}]},
            {"name": "external"}
        ]))
        .unwrap();

        assert_eq!(config.indexes.len(), 2);
        assert_eq!(
            config.indexes[0].crawlers[0],
            Crawler::for_partition("master", Some("/social/messages".to_string()))
        );
        assert!(config.indexes[1].crawlers.is_empty());
    }
}
