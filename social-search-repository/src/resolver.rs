//! Resolution of the messages search index for a partition.

use std::sync::{Arc, Once};

use social_search_shared::SettingsConfiguration;
use tracing::{debug, error, warn};

use crate::errors::SocialSearchError;
use crate::interfaces::{
    ConfigurationProvider, ConfigurationProviderExt, IndexRegistry, PartitionStore, SearchIndex,
};
use crate::types::AccessMode;

static INDEXES_NOT_INITIALIZED: Once = Once::new();

/// Locates the messages index of the store's partition.
///
/// The index bound to the messages root item wins when its name is one of the configured
/// messages index names. Otherwise exactly one registered index must have a crawler bound
/// to the partition and carry a configured name. Every failure is logged and yields
/// `None`; resolution never returns an error.
pub struct IndexResolver {
    configuration: Arc<dyn ConfigurationProvider>,
    store: Arc<dyn PartitionStore>,
    registry: Arc<dyn IndexRegistry>,
}

impl IndexResolver {
    pub fn new(
        configuration: Arc<dyn ConfigurationProvider>,
        store: Arc<dyn PartitionStore>,
        registry: Arc<dyn IndexRegistry>,
    ) -> Self {
        Self {
            configuration,
            store,
            registry,
        }
    }

    /// Resolve the messages index, or `None` if it cannot be determined.
    pub async fn resolve(&self) -> Option<Arc<dyn SearchIndex>> {
        if self.registry.indexes().is_empty() {
            INDEXES_NOT_INITIALIZED.call_once(|| {
                warn!("Attempt to access search indexes before they were initialized");
            });
            return None;
        }

        let partition = self.store.partition();

        let settings = match self.configuration.get::<SettingsConfiguration>() {
            Ok(settings) => settings,
            Err(e) => {
                error!(
                    partition = %partition,
                    error = %e,
                    "Social messages index could not be determined: settings are unavailable"
                );
                return None;
            }
        };

        match self.try_resolve(&settings).await {
            Ok(index) => index,
            Err(e) => {
                error!(
                    partition = %partition,
                    messages_root_path = %settings.messages_root_path,
                    error = %e,
                    "Social messages index could not be determined. Please check indexes configuration"
                );
                None
            }
        }
    }

    async fn try_resolve(
        &self,
        settings: &SettingsConfiguration,
    ) -> Result<Option<Arc<dyn SearchIndex>>, SocialSearchError> {
        let partition = self.store.partition();

        let messages_root = self
            .store
            .item_by_path(&settings.messages_root_path, AccessMode::System)
            .await?;

        let Some(messages_root) = messages_root else {
            error!(
                partition = %partition,
                messages_root_path = %settings.messages_root_path,
                "Social messages index could not be determined: messages root item not found"
            );
            return Ok(None);
        };

        let root_index = self.registry.index_for(&messages_root)?;
        if settings.is_messages_index(root_index.name()) {
            debug!(partition = %partition, index = %root_index.name(), "Resolved messages index from root item");
            return Ok(Some(root_index));
        }

        let mut candidates = self.registry.indexes().into_iter().filter(|index| {
            settings.is_messages_index(index.name())
                && index
                    .crawlers()
                    .iter()
                    .any(|crawler| crawler.partition.as_deref() == Some(partition))
        });

        match (candidates.next(), candidates.next()) {
            (Some(index), None) => {
                debug!(partition = %partition, index = %index.name(), "Resolved messages index from crawlers");
                Ok(Some(index))
            }
            (None, _) => Err(SocialSearchError::index_not_found(format!(
                "No index named '{}' or '{}' crawls partition '{}'",
                settings.messages_search_index_master,
                settings.messages_search_index_web,
                partition
            ))),
            (Some(_), Some(_)) => Err(SocialSearchError::index_not_found(format!(
                "More than one messages index crawls partition '{}'",
                partition
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemoryPartitionStore, InMemorySearchIndex, JsonConfigurationProvider};
    use crate::registry::StaticIndexRegistry;
    use crate::types::{Crawler, StoredItem};
    use async_trait::async_trait;
    use serde_json::json;
    use social_search_shared::Identifier;

    const ROOT_PATH: &str = "/social/messages";

    fn configuration() -> Arc<dyn ConfigurationProvider> {
        Arc::new(
            JsonConfigurationProvider::from_value(json!({
                "settings": {
                    "messages_root_path": ROOT_PATH,
                    "messages_search_index_master": "social_messages_master",
                    "messages_search_index_web": "social_messages_web",
                    "posting_configuration_base_template_id": Identifier::new_v4().to_string()
                }
            }))
            .unwrap(),
        )
    }

    async fn store_with_root() -> Arc<InMemoryPartitionStore> {
        let store = Arc::new(InMemoryPartitionStore::new("master"));
        store
            .insert_item(StoredItem {
                id: Identifier::new_v4(),
                path: ROOT_PATH.to_string(),
                partition: String::new(),
                template_id: Identifier::new_v4(),
                base_template_ids: vec![],
                parent_id: None,
                restricted: true,
            })
            .await;
        store
    }

    fn index(
        store: &Arc<InMemoryPartitionStore>,
        name: &str,
        crawlers: Vec<Crawler>,
    ) -> Arc<dyn SearchIndex> {
        Arc::new(InMemorySearchIndex::new(name, crawlers, store.clone()))
    }

    fn resolver(
        store: Arc<InMemoryPartitionStore>,
        indexes: Vec<Arc<dyn SearchIndex>>,
    ) -> IndexResolver {
        IndexResolver::new(
            configuration(),
            store,
            Arc::new(StaticIndexRegistry::new(indexes)),
        )
    }

    #[tokio::test]
    async fn test_no_registered_indexes() {
        let store = store_with_root().await;
        assert!(resolver(store, vec![]).resolve().await.is_none());
    }

    #[tokio::test]
    async fn test_root_index_with_configured_name() {
        let store = store_with_root().await;
        let indexes = vec![index(
            &store,
            "social_messages_master",
            vec![Crawler::for_partition("master", Some(ROOT_PATH.to_string()))],
        )];

        let resolved = resolver(store, indexes).resolve().await.unwrap();

        assert_eq!(resolved.name(), "social_messages_master");
    }

    #[tokio::test]
    async fn test_falls_back_to_single_crawler_match() {
        let store = store_with_root().await;
        let indexes = vec![
            index(&store, "master_index", vec![Crawler::for_partition("master", None)]),
            index(
                &store,
                "social_messages_web",
                vec![Crawler::for_partition("web", None)],
            ),
            index(
                &store,
                "social_messages_master",
                vec![Crawler::default(), Crawler::for_partition("master", Some("/elsewhere".to_string()))],
            ),
        ];

        let resolved = resolver(store, indexes).resolve().await.unwrap();

        assert_eq!(resolved.name(), "social_messages_master");
    }

    #[tokio::test]
    async fn test_ambiguous_crawler_match_resolves_to_none() {
        let store = store_with_root().await;
        let indexes = vec![
            index(&store, "master_index", vec![Crawler::for_partition("master", None)]),
            index(
                &store,
                "social_messages_master",
                vec![Crawler::for_partition("master", Some("/elsewhere".to_string()))],
            ),
            index(
                &store,
                "social_messages_web",
                vec![Crawler::for_partition("master", Some("/other".to_string()))],
            ),
        ];

        assert!(resolver(store, indexes).resolve().await.is_none());
    }

    #[tokio::test]
    async fn test_missing_root_item() {
        let store = Arc::new(InMemoryPartitionStore::new("master"));
        let indexes = vec![index(
            &store,
            "social_messages_master",
            vec![Crawler::for_partition("master", None)],
        )];

        assert!(resolver(store, indexes).resolve().await.is_none());
    }

    #[tokio::test]
    async fn test_root_not_covered_by_any_index() {
        let store = store_with_root().await;
        let indexes = vec![index(
            &store,
            "social_messages_master",
            vec![Crawler::for_partition("web", None)],
        )];

        assert!(resolver(store, indexes).resolve().await.is_none());
    }

    struct FailingStore;

    #[async_trait]
    impl PartitionStore for FailingStore {
        fn partition(&self) -> &str {
            "master"
        }

        async fn item_by_path(
            &self,
            _path: &str,
            _access: AccessMode,
        ) -> Result<Option<StoredItem>, SocialSearchError> {
            Err(SocialSearchError::store("database unavailable"))
        }

        async fn item(
            &self,
            _id: &Identifier,
            _access: AccessMode,
        ) -> Result<Option<StoredItem>, SocialSearchError> {
            Err(SocialSearchError::store("database unavailable"))
        }

        async fn children(
            &self,
            _id: &Identifier,
            _access: AccessMode,
        ) -> Result<Vec<StoredItem>, SocialSearchError> {
            Err(SocialSearchError::store("database unavailable"))
        }
    }

    #[tokio::test]
    async fn test_store_errors_resolve_to_none() {
        let store = Arc::new(InMemoryPartitionStore::new("master"));
        let indexes = vec![index(
            &store,
            "social_messages_master",
            vec![Crawler::for_partition("master", None)],
        )];
        let resolver = IndexResolver::new(
            configuration(),
            Arc::new(FailingStore),
            Arc::new(StaticIndexRegistry::new(indexes)),
        );

        assert!(resolver.resolve().await.is_none());
    }

    #[tokio::test]
    async fn test_missing_settings_resolve_to_none() {
        let store = store_with_root().await;
        let indexes = vec![index(
            &store,
            "social_messages_master",
            vec![Crawler::for_partition("master", None)],
        )];
        let resolver = IndexResolver::new(
            Arc::new(JsonConfigurationProvider::from_value(json!({})).unwrap()),
            store,
            Arc::new(StaticIndexRegistry::new(indexes)),
        );

        assert!(resolver.resolve().await.is_none());
    }
}
