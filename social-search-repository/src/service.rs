//! Social search service implementation.
//!
//! This module provides the query API over the social messages index. Messages and their
//! posting configurations are stored as separate documents; every query combines a field
//! predicate with a template filter built from configuration and returns identifiers.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use social_search_shared::{
    normalize_container, unposted_date, Identifier, SearchDocument, SearchField,
    SettingsConfiguration,
};
use tracing::{debug, instrument};

use crate::config::SocialSearchServiceConfig;
use crate::errors::SocialSearchError;
use crate::filters::{parse_template_id, Predicate, TemplateFilters};
use crate::interfaces::{
    ConfigurationProvider, ConfigurationProviderExt, IndexRegistry, PartitionStore, SearchIndex,
};
use crate::resolver::IndexResolver;
use crate::types::{AccessMode, IndexingOptions, ItemUri, Projection, SecurityOptions};

/// The main service for querying the social messages index.
///
/// The messages index is resolved once, when the service is created, and kept for the
/// lifetime of the service. When no index could be resolved every query returns an empty
/// list and index updates are no-ops.
///
/// Queries run with security checks disabled: the service has system-level visibility
/// regardless of who calls it.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use social_search_repository::memory::{InMemoryPartitionStore, JsonConfigurationProvider};
/// use social_search_repository::{SocialSearchService, StaticIndexRegistry};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let configuration = Arc::new(JsonConfigurationProvider::from_path("social.json")?);
/// let store = Arc::new(InMemoryPartitionStore::new("master"));
/// let registry = Arc::new(StaticIndexRegistry::new(vec![]));
///
/// let service = SocialSearchService::new(configuration, store, registry).await;
/// let ready = service.messages_ready_to_post(&[]).await?;
/// # Ok(())
/// # }
/// ```
pub struct SocialSearchService {
    configuration: Arc<dyn ConfigurationProvider>,
    store: Arc<dyn PartitionStore>,
    index: Option<Arc<dyn SearchIndex>>,
    filters: TemplateFilters,
    config: SocialSearchServiceConfig,
}

impl SocialSearchService {
    /// Create a new SocialSearchService with default configuration, resolving the
    /// messages index of the store's partition.
    pub async fn new(
        configuration: Arc<dyn ConfigurationProvider>,
        store: Arc<dyn PartitionStore>,
        registry: Arc<dyn IndexRegistry>,
    ) -> Self {
        Self::with_config(
            configuration,
            store,
            registry,
            SocialSearchServiceConfig::default(),
        )
        .await
    }

    /// Create a new SocialSearchService with custom configuration.
    pub async fn with_config(
        configuration: Arc<dyn ConfigurationProvider>,
        store: Arc<dyn PartitionStore>,
        registry: Arc<dyn IndexRegistry>,
        config: SocialSearchServiceConfig,
    ) -> Self {
        let resolver = IndexResolver::new(configuration.clone(), store.clone(), registry);
        let index = resolver.resolve().await;
        Self::with_index(configuration, store, index, config)
    }

    /// Create a service over an already resolved index (or none).
    pub fn with_index(
        configuration: Arc<dyn ConfigurationProvider>,
        store: Arc<dyn PartitionStore>,
        index: Option<Arc<dyn SearchIndex>>,
        config: SocialSearchServiceConfig,
    ) -> Self {
        Self {
            filters: TemplateFilters::new(configuration.clone()),
            configuration,
            store,
            index,
            config,
        }
    }

    /// The resolved messages index, if any.
    pub fn search_index(&self) -> Option<&Arc<dyn SearchIndex>> {
        self.index.as_ref()
    }

    /// Messages whose posting configurations live in `container`.
    pub async fn messages_by_container(
        &self,
        container: &str,
    ) -> Result<Vec<Identifier>, SocialSearchError> {
        let container = normalize_container(container, self.store.partition());
        let predicate = Predicate::eq(SearchField::Container, container)
            .and(self.filters.is_posting_configuration()?);

        self.search_items(&predicate, Projection::Parent).await
    }

    /// Messages having a posting configuration for `account_id`.
    pub async fn messages_by_account(
        &self,
        account_id: &Identifier,
    ) -> Result<Vec<Identifier>, SocialSearchError> {
        let predicate = Predicate::eq(SearchField::AccountId, *account_id)
            .and(self.filters.is_posting_configuration()?);

        self.search_items(&predicate, Projection::Parent).await
    }

    /// Messages in the workflow state `workflow_state_id`.
    ///
    /// `Identifier::EMPTY` selects messages outside any workflow.
    pub async fn messages_by_workflow_state(
        &self,
        workflow_state_id: &Identifier,
    ) -> Result<Vec<Identifier>, SocialSearchError> {
        let predicate = Predicate::eq(SearchField::WorkflowStateId, *workflow_state_id)
            .and(self.filters.is_message()?);

        self.search_items(&predicate, Projection::ItemId).await
    }

    /// Messages that have been posted.
    pub async fn posted_messages(&self) -> Result<Vec<Identifier>, SocialSearchError> {
        let predicate = Predicate::ne(SearchField::MessagePostedDate, unposted_date())
            .and(self.filters.is_message()?);

        self.search_items(&predicate, Projection::ItemId).await
    }

    /// Messages that have never been posted.
    pub async fn not_posted_messages(&self) -> Result<Vec<Identifier>, SocialSearchError> {
        let predicate = Predicate::eq(SearchField::MessagePostedDate, unposted_date())
            .and(self.filters.is_message()?);

        self.search_items(&predicate, Projection::ItemId).await
    }

    /// Messages posted on the calendar day of `posted_at`. The time of day is ignored.
    pub async fn posted_messages_on(
        &self,
        posted_at: DateTime<Utc>,
    ) -> Result<Vec<Identifier>, SocialSearchError> {
        let predicate = Predicate::eq(SearchField::MessagePostedDate, posted_at.date_naive())
            .and(self.filters.is_message()?);

        self.search_items(&predicate, Projection::ItemId).await
    }

    /// Messages created on the calendar day of `created_at`. The time of day is ignored.
    pub async fn messages_by_created_date(
        &self,
        created_at: DateTime<Utc>,
    ) -> Result<Vec<Identifier>, SocialSearchError> {
        let predicate = Predicate::eq(SearchField::MessageCreatedDate, created_at.date_naive())
            .and(self.filters.is_message()?);

        self.search_items(&predicate, Projection::ItemId).await
    }

    /// Messages ready to be posted automatically for any of `account_ids`.
    ///
    /// A message qualifies when it is unposted and approved (final workflow state, or no
    /// workflow) and it owns a published content posting configuration that posts
    /// automatically for one of the accounts. An empty `account_ids` slice does not
    /// restrict accounts.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Identifier>)` - Qualifying message ids, without duplicates
    /// * `Err(SocialSearchError::ConfigurationError)` - If candidate messages exist and
    ///   the content posting configuration is missing or ambiguous
    /// * `Err(SocialSearchError)` - If a query fails
    #[instrument(skip(self), level = "debug")]
    pub async fn messages_ready_to_post(
        &self,
        account_ids: &[Identifier],
    ) -> Result<Vec<Identifier>, SocialSearchError> {
        let message_filter = Predicate::eq(SearchField::MessagePostedDate, unposted_date())
            .and(
                Predicate::is_true(SearchField::FinalWorkflowState).or(Predicate::eq(
                    SearchField::WorkflowStateId,
                    Identifier::EMPTY,
                )),
            )
            .and(self.filters.is_message()?);

        let candidate_messages = self
            .search_items(&message_filter, Projection::ItemId)
            .await?;
        if candidate_messages.is_empty() {
            debug!("No unposted approved messages");
            return Ok(Vec::new());
        }

        let content_posting_template_id = self
            .filters
            .posting_configuration_template_id(&self.config.content_posting_name)?;

        let mut posting_configuration_filter =
            Predicate::eq(SearchField::TemplateId, content_posting_template_id)
                .and(Predicate::is_true(SearchField::PostAutomatically))
                .and(Predicate::is_true(SearchField::ItemPublished));

        if let Some(account_filter) = Predicate::any_of(
            account_ids
                .iter()
                .map(|account_id| Predicate::eq(SearchField::AccountId, *account_id)),
        ) {
            posting_configuration_filter = posting_configuration_filter.and(account_filter);
        }

        let posting_messages = self
            .search_items(&posting_configuration_filter, Projection::Parent)
            .await?;
        if posting_messages.is_empty() {
            debug!(
                candidate_messages = candidate_messages.len(),
                "No automatic posting configurations"
            );
            return Ok(Vec::new());
        }

        let posting_messages: HashSet<Identifier> = posting_messages.into_iter().collect();
        let mut seen = HashSet::new();
        let ready: Vec<Identifier> = candidate_messages
            .into_iter()
            .filter(|id| posting_messages.contains(id) && seen.insert(*id))
            .collect();

        debug!(ready = ready.len(), "Messages ready to post automatically");
        Ok(ready)
    }

    /// Force synchronous re-indexing of one item. No-op without an index.
    pub async fn update_index(&self, item_id: &Identifier) -> Result<(), SocialSearchError> {
        let Some(index) = &self.index else {
            return Ok(());
        };

        let uri = ItemUri::new(*item_id, self.store.partition());
        index.update(&uri, IndexingOptions::ForcedIndexing).await
    }

    /// Re-index a message together with its posting configuration.
    ///
    /// The posting configuration is the first direct child of the message whose template
    /// inherits from the configured posting configuration base template.
    pub async fn update_index_on_message(
        &self,
        message_id: &Identifier,
    ) -> Result<(), SocialSearchError> {
        let settings = self.configuration.get::<SettingsConfiguration>()?;
        let base_template_id = parse_template_id(&settings.posting_configuration_base_template_id)?;

        let posting_configuration_id = self
            .store
            .children(message_id, AccessMode::System)
            .await?
            .into_iter()
            .find(|child| child.is_of_schema(&base_template_id))
            .map(|child| child.id)
            .unwrap_or(Identifier::EMPTY);

        self.update_index_on_message_with(message_id, &posting_configuration_id)
            .await
    }

    /// Re-index a message and, unless `posting_configuration_id` is empty, the given
    /// posting configuration.
    pub async fn update_index_on_message_with(
        &self,
        message_id: &Identifier,
        posting_configuration_id: &Identifier,
    ) -> Result<(), SocialSearchError> {
        self.update_index(message_id).await?;

        if !posting_configuration_id.is_empty() {
            self.update_index(posting_configuration_id).await?;
        }

        Ok(())
    }

    /// Run `predicate` against the messages index and project the matches.
    ///
    /// The session is opened with security checks disabled and released before this
    /// returns, on success or error.
    pub async fn search_items(
        &self,
        predicate: &Predicate,
        projection: Projection,
    ) -> Result<Vec<Identifier>, SocialSearchError> {
        let Some(index) = &self.index else {
            return Ok(Vec::new());
        };

        let documents = {
            let session = index
                .open_session(SecurityOptions::DisableSecurityCheck)
                .await?;
            session.search(predicate).await?
        };

        debug!(
            index = %index.name(),
            matches = documents.len(),
            projection = ?projection,
            "Search executed"
        );
        Ok(project(documents, projection))
    }
}

fn project(documents: Vec<SearchDocument>, projection: Projection) -> Vec<Identifier> {
    match projection {
        Projection::ItemId => documents.into_iter().map(|doc| doc.item_id).collect(),
        Projection::Parent => documents.into_iter().filter_map(|doc| doc.parent_id).collect(),
    }
}
