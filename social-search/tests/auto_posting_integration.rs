//! Integration tests for the auto-posting agent.
//!
//! These tests use the real AutoPostingAgent and SocialSearchService over the in-memory
//! backends, and a mock index where failures are needed.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use serde_json::json;
use social_search::{AgentConfig, AgentError, AutoPostingAgent};
use social_search_repository::memory::{
    InMemoryPartitionStore, InMemorySearchIndex, JsonConfigurationProvider,
};
use social_search_repository::{
    Crawler, IndexingOptions, ItemUri, Predicate, SearchIndex, SearchSession,
    SecurityOptions, SocialSearchError, SocialSearchService, SocialSearchServiceConfig,
    StaticIndexRegistry, StoredItem,
};
use social_search_shared::{Identifier, SearchDocument};

const ROOT_PATH: &str = "/social/messages";
const TWEET: &str = "10000000-0000-0000-0000-000000000001";
const CONTENT_POSTING: &str = "20000000-0000-0000-0000-000000000001";

fn configuration(posting_configurations: serde_json::Value) -> Arc<JsonConfigurationProvider> {
    Arc::new(
        JsonConfigurationProvider::from_value(json!({
            "networks": [
                {"name": "Twitter", "items": [{"name": "Tweet", "message_template_id": TWEET}]}
            ],
            "posting_configurations": posting_configurations,
            "settings": {
                "messages_root_path": ROOT_PATH,
                "messages_search_index_master": "social_messages_master",
                "messages_search_index_web": "social_messages_web",
                "posting_configuration_base_template_id": "20000000-0000-0000-0000-0000000000ff"
            }
        }))
        .unwrap(),
    )
}

fn default_configuration() -> Arc<JsonConfigurationProvider> {
    configuration(json!([{"name": "ContentPosting", "template_id": CONTENT_POSTING}]))
}

/// An approved message and its automatic content posting configuration for `account`.
fn ready_message(account: Identifier) -> (SearchDocument, SearchDocument) {
    let message = SearchDocument {
        final_workflow_state: true,
        workflow_state_id: Identifier::new_v4(),
        ..SearchDocument::new(Identifier::new_v4(), Identifier::parse(TWEET).unwrap())
    };
    let posting = SearchDocument {
        parent_id: Some(message.item_id),
        account_id: account,
        post_automatically: true,
        item_published: true,
        ..SearchDocument::new(
            Identifier::new_v4(),
            Identifier::parse(CONTENT_POSTING).unwrap(),
        )
    };
    (message, posting)
}

async fn service(
    configuration: Arc<JsonConfigurationProvider>,
    documents: Vec<SearchDocument>,
) -> Arc<SocialSearchService> {
    let store = Arc::new(InMemoryPartitionStore::new("master"));
    store
        .insert_item(StoredItem {
            id: Identifier::new_v4(),
            path: ROOT_PATH.to_string(),
            partition: String::new(),
            template_id: Identifier::new_v4(),
            base_template_ids: vec![],
            parent_id: None,
            restricted: false,
        })
        .await;

    let index: Arc<dyn SearchIndex> = Arc::new(InMemorySearchIndex::with_documents(
        "social_messages_master",
        vec![Crawler::for_partition("master", Some(ROOT_PATH.to_string()))],
        store.clone(),
        documents,
    ));
    let registry = Arc::new(StaticIndexRegistry::new(vec![index]));

    let service = SocialSearchService::new(configuration, store, registry).await;
    assert!(service.search_index().is_some());
    Arc::new(service)
}

fn agent(service: Arc<SocialSearchService>, account_ids: Vec<Identifier>) -> Arc<AutoPostingAgent> {
    Arc::new(AutoPostingAgent::with_config(
        service,
        AgentConfig {
            interval: Duration::from_millis(10),
            account_ids,
        },
    ))
}

async fn wait_for_runs(agent: &AutoPostingAgent, runs: u64) {
    timeout(Duration::from_secs(5), async {
        while agent.total_runs() < runs {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("Agent did not run in time");
}

#[tokio::test]
async fn test_run_once_reports_ready_messages() {
    let account = Identifier::new_v4();
    let (message, posting) = ready_message(account);
    let (other_message, other_posting) = ready_message(Identifier::new_v4());
    let service = service(
        default_configuration(),
        vec![message.clone(), posting, other_message, other_posting],
    )
    .await;

    let agent = agent(service, vec![account]);

    assert_eq!(agent.run_once().await.unwrap(), vec![message.item_id]);
    assert_eq!(agent.total_runs(), 1);
}

#[tokio::test]
async fn test_run_until_shutdown() {
    let account = Identifier::new_v4();
    let (message, posting) = ready_message(account);
    let service = service(default_configuration(), vec![message, posting]).await;
    let agent = agent(service, vec![]);

    let handle = tokio::spawn({
        let agent = agent.clone();
        async move { agent.run().await }
    });

    wait_for_runs(&agent, 2).await;
    agent.shutdown();

    let result = timeout(Duration::from_secs(5), handle)
        .await
        .expect("Agent did not stop in time")
        .expect("Agent task panicked");

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_run_stops_on_configuration_error() {
    let account = Identifier::new_v4();
    let (message, posting) = ready_message(account);
    let service = service(configuration(json!([])), vec![message, posting]).await;
    let agent = agent(service, vec![account]);

    let result = timeout(Duration::from_secs(5), agent.run())
        .await
        .expect("Agent did not stop in time");

    match result {
        Err(AgentError::SearchError(e)) => assert!(e.is_configuration()),
        other => panic!("Expected a configuration error, got {:?}", other),
    }
}

// Mock index whose searches always fail
struct UnavailableIndex {
    crawlers: Vec<Crawler>,
}

struct UnavailableSession;

#[async_trait::async_trait]
impl SearchIndex for UnavailableIndex {
    fn name(&self) -> &str {
        "social_messages_master"
    }

    fn crawlers(&self) -> &[Crawler] {
        &self.crawlers
    }

    async fn open_session(
        &self,
        _security: SecurityOptions,
    ) -> Result<Box<dyn SearchSession>, SocialSearchError> {
        Ok(Box::new(UnavailableSession))
    }

    async fn update(
        &self,
        _uri: &ItemUri,
        _options: IndexingOptions,
    ) -> Result<(), SocialSearchError> {
        Err(SocialSearchError::update("Mock index unavailable"))
    }
}

#[async_trait::async_trait]
impl SearchSession for UnavailableSession {
    async fn search(
        &self,
        _predicate: &Predicate,
    ) -> Result<Vec<SearchDocument>, SocialSearchError> {
        Err(SocialSearchError::query("Mock index unavailable"))
    }
}

#[tokio::test]
async fn test_run_survives_query_failures() {
    let service = Arc::new(SocialSearchService::with_index(
        default_configuration(),
        Arc::new(InMemoryPartitionStore::new("master")),
        Some(Arc::new(UnavailableIndex { crawlers: vec![] }) as Arc<dyn SearchIndex>),
        SocialSearchServiceConfig::default(),
    ));
    let agent = agent(service, vec![]);

    assert!(!agent.run_once().await.unwrap_err().is_fatal());

    let handle = tokio::spawn({
        let agent = agent.clone();
        async move { agent.run().await }
    });

    wait_for_runs(&agent, 3).await;
    agent.shutdown();

    let result = timeout(Duration::from_secs(5), handle)
        .await
        .expect("Agent did not stop in time")
        .expect("Agent task panicked");

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_shutdown_requested_before_run() {
    let account = Identifier::new_v4();
    let (message, posting) = ready_message(account);
    let service = service(default_configuration(), vec![message, posting]).await;
    let agent = agent(service, vec![account]);

    agent.shutdown();

    let result = timeout(Duration::from_secs(5), agent.run())
        .await
        .expect("Agent did not stop in time");

    assert!(result.is_ok());
    assert_eq!(agent.total_runs(), 0);
}
