//! Dependency initialization and wiring for the auto-posting agent.

use std::env;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::agent::{AgentConfig, AutoPostingAgent, DEFAULT_INTERVAL};
use crate::StartupError;
use social_search_repository::memory::{
    InMemoryPartitionStore, InMemorySearchIndex, JsonConfigurationProvider, PartitionSnapshot,
};
use social_search_repository::{
    AccessMode, ConfigurationProviderExt, IndexesConfiguration, IndexingOptions, OpenSearchIndex,
    OpenSearchIndexConfig, PartitionStore, SearchIndex, SocialSearchService, StaticIndexRegistry,
};
use social_search_shared::Identifier;

/// Default path of the JSON configuration document.
const DEFAULT_CONFIG_PATH: &str = "social.json";

/// Default partition served by the agent.
const DEFAULT_PARTITION: &str = "master";

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Connection mode for OpenSearch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry connection every 15 seconds until successful.
    Retry,
}

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured agent ready to run.
    pub agent: AutoPostingAgent,
}

impl ConnectionMode {
    /// Parse connection mode from environment variable.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive)
    /// Defaults to "retry" if not set or invalid.
    fn from_env() -> Self {
        Self::parse(&env::var("OPENSEARCH_CONNECTION_MODE").unwrap_or_else(|_| "retry".to_string()))
    }

    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            _ => {
                warn!("Invalid OPENSEARCH_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Parse a comma-separated list of account ids. Blank entries are ignored.
pub fn parse_account_ids(value: &str) -> Result<Vec<Identifier>, StartupError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            Identifier::parse(raw)
                .map_err(|e| StartupError::config(format!("Invalid account id '{}': {}", raw, e)))
        })
        .collect()
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SOCIAL_CONFIG_PATH`: JSON configuration document (default: social.json)
    /// - `SOCIAL_ITEMS_PATH`: JSON snapshot of the partition items and documents (optional)
    /// - `SOCIAL_PARTITION`: Partition served when no snapshot is given (default: master)
    /// - `OPENSEARCH_URL`: OpenSearch server URL (optional; in-memory indexes when unset)
    /// - `OPENSEARCH_CONNECTION_MODE`: Connection mode - "fail-fast" or "retry" (default: retry)
    /// - `OPENSEARCH_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    /// - `AUTO_POST_ACCOUNTS`: Comma-separated account ids (default: every account)
    /// - `AUTO_POST_INTERVAL_SECS`: Seconds between two queries (default: 60)
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(StartupError)` - If initialization fails
    pub async fn new() -> Result<Self, StartupError> {
        let config_path =
            env::var("SOCIAL_CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let items_path = env::var("SOCIAL_ITEMS_PATH").ok();
        let partition =
            env::var("SOCIAL_PARTITION").unwrap_or_else(|_| DEFAULT_PARTITION.to_string());
        let opensearch_url = env::var("OPENSEARCH_URL").ok();
        let connection_mode = ConnectionMode::from_env();
        let retry_interval = env::var("OPENSEARCH_RETRY_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_INTERVAL_SECS);
        let account_ids = parse_account_ids(&env::var("AUTO_POST_ACCOUNTS").unwrap_or_default())?;
        let interval = env::var("AUTO_POST_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_INTERVAL);

        info!(
            config_path = %config_path,
            items_path = ?items_path,
            partition = %partition,
            opensearch_url = ?opensearch_url,
            connection_mode = ?connection_mode,
            accounts = account_ids.len(),
            interval_secs = interval.as_secs(),
            "Initializing dependencies"
        );

        let configuration = Arc::new(
            JsonConfigurationProvider::from_path(&config_path)
                .map_err(|e| StartupError::config(format!("Failed to load configuration: {}", e)))?,
        );

        let store = Arc::new(match items_path {
            Some(path) => {
                let snapshot = PartitionSnapshot::from_path(&path).map_err(|e| {
                    StartupError::config(format!("Failed to load partition snapshot: {}", e))
                })?;
                if snapshot.partition != partition {
                    warn!(
                        snapshot_partition = %snapshot.partition,
                        partition = %partition,
                        "Partition snapshot overrides SOCIAL_PARTITION"
                    );
                }
                InMemoryPartitionStore::from_snapshot(snapshot)
            }
            None => InMemoryPartitionStore::new(partition),
        });

        let index_settings = match configuration.get::<IndexesConfiguration>() {
            Ok(config) => config.indexes,
            Err(e) => {
                warn!(error = %e, "No indexes configured");
                Vec::new()
            }
        };

        let mut indexes: Vec<Arc<dyn SearchIndex>> = Vec::with_capacity(index_settings.len());
        for settings in index_settings {
            let index: Arc<dyn SearchIndex> = match &opensearch_url {
                Some(url) => {
                    let index = Self::connect_to_opensearch(
                        url,
                        OpenSearchIndexConfig::new(settings.name, settings.crawlers),
                        store.clone(),
                        connection_mode,
                        Duration::from_secs(retry_interval),
                    )
                    .await?;

                    // Exits if the index cannot be created
                    index.ensure_index_exists().await.map_err(|e| {
                        StartupError::config(format!("Failed to ensure index exists: {}", e))
                    })?;
                    Arc::new(index)
                }
                None => Arc::new(InMemorySearchIndex::new(
                    settings.name,
                    settings.crawlers,
                    store.clone(),
                )),
            };

            // Both backends start from the same partition snapshot
            let seeded = Self::seed(index.as_ref(), &store).await;
            info!(index = %index.name(), documents = seeded, "Index seeded");
            indexes.push(index);
        }

        info!(indexes = indexes.len(), "Search indexes registered");

        let registry = Arc::new(StaticIndexRegistry::new(indexes));
        let service = SocialSearchService::new(configuration, store, registry).await;
        if service.search_index().is_none() {
            warn!("No social messages index resolved; every query will return no messages");
        }

        let agent = AutoPostingAgent::with_config(
            Arc::new(service),
            AgentConfig {
                interval,
                account_ids,
            },
        );

        Ok(Self { agent })
    }

    /// Re-index every stored document whose item is covered by one of the index
    /// crawlers. Returns the number of documents indexed; failures are logged and skipped.
    async fn seed(index: &dyn SearchIndex, store: &InMemoryPartitionStore) -> usize {
        let mut seeded = 0;
        for document in store.documents().await {
            let item = match store.item(&document.item_id, AccessMode::System).await {
                Ok(Some(item)) => item,
                Ok(None) => continue,
                Err(e) => {
                    warn!(item_id = %document.item_id, error = %e, "Skipping document");
                    continue;
                }
            };
            if !index.crawlers().iter().any(|crawler| crawler.covers(&item)) {
                continue;
            }
            match index.update(&item.uri(), IndexingOptions::ForcedIndexing).await {
                Ok(()) => seeded += 1,
                Err(e) => warn!(index = %index.name(), uri = %item.uri(), error = %e, "Failed to seed document"),
            }
        }
        seeded
    }

    /// Connect to OpenSearch with retry logic based on connection mode.
    async fn connect_to_opensearch(
        url: &str,
        config: OpenSearchIndexConfig,
        store: Arc<InMemoryPartitionStore>,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<OpenSearchIndex, StartupError> {
        loop {
            match OpenSearchIndex::connect(url, config.clone(), store.clone()).await {
                Ok(index) => {
                    info!(index = %config.name, "OpenSearch connection established");
                    return Ok(index);
                }
                Err(e) => match mode {
                    ConnectionMode::FailFast => {
                        return Err(StartupError::config(format!(
                            "Failed to connect to OpenSearch: {}",
                            e
                        )));
                    }
                    ConnectionMode::Retry => {
                        warn!(
                            opensearch_url = %url,
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to connect to OpenSearch, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use social_search_repository::{Crawler, Predicate, SecurityOptions, StoredItem};
    use social_search_shared::SearchDocument;

    #[test]
    fn test_connection_mode_parse() {
        assert_eq!(ConnectionMode::parse("fail-fast"), ConnectionMode::FailFast);
        assert_eq!(ConnectionMode::parse("FAIL_FAST"), ConnectionMode::FailFast);
        assert_eq!(ConnectionMode::parse("retry"), ConnectionMode::Retry);
        assert_eq!(ConnectionMode::parse("sometimes"), ConnectionMode::Retry);
    }

    #[test]
    fn test_parse_account_ids() {
        let first = Identifier::new_v4();
        let second = Identifier::new_v4();

        let ids = parse_account_ids(&format!(" {}, ,{} ", first, second)).unwrap();

        assert_eq!(ids, vec![first, second]);
        assert!(parse_account_ids("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_account_ids_rejects_garbage() {
        let err = parse_account_ids("not-an-id").unwrap_err();
        assert!(matches!(err, StartupError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_seed_indexes_covered_documents() {
        let store = Arc::new(InMemoryPartitionStore::new("master"));
        let covered = SearchDocument::new(Identifier::new_v4(), Identifier::new_v4());
        let outside = SearchDocument::new(Identifier::new_v4(), Identifier::new_v4());
        let orphan = SearchDocument::new(Identifier::new_v4(), Identifier::new_v4());

        for (document, path) in [(&covered, "/social/messages/a"), (&outside, "/content/b")] {
            store
                .insert_item(StoredItem {
                    id: document.item_id,
                    path: path.to_string(),
                    partition: String::new(),
                    template_id: document.template_id,
                    base_template_ids: vec![],
                    parent_id: None,
                    restricted: true,
                })
                .await;
        }
        for document in [&covered, &outside, &orphan] {
            store.put_document(document.clone()).await;
        }

        let index = InMemorySearchIndex::new(
            "social_messages_master",
            vec![Crawler::for_partition(
                "master",
                Some("/social/messages".to_string()),
            )],
            store.clone(),
        );
        assert!(index.is_empty().await);

        assert_eq!(Dependencies::seed(&index, &store).await, 1);

        let session = index
            .open_session(SecurityOptions::DisableSecurityCheck)
            .await
            .unwrap();
        assert_eq!(
            session.search(&Predicate::Const(true)).await.unwrap(),
            vec![covered]
        );
    }
}
