//! OpenSearch index implementation.
//!
//! This module provides the concrete implementation of `SearchIndex` using the
//! OpenSearch Rust crate.

use std::sync::Arc;

use async_trait::async_trait;
use opensearch::{
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    params::Refresh,
    DeleteParts, IndexParts, OpenSearch, SearchParts,
};
use serde_json::{json, Value};
use social_search_shared::SearchDocument;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::errors::SocialSearchError;
use crate::filters::Predicate;
use crate::interfaces::{DocumentSource, SearchIndex, SearchSession};
use crate::opensearch::index_config::{get_index_settings, OpenSearchIndexConfig};
use crate::opensearch::query::to_query_dsl;
use crate::types::{Crawler, IndexingOptions, ItemUri, SecurityOptions};

/// OpenSearch index implementation.
///
/// Documents are stored under `{item_id}_{partition}` and fetched from the
/// `DocumentSource` when an item is re-indexed.
///
/// # Example
///
/// ```ignore
/// use social_search_repository::opensearch::{OpenSearchIndex, OpenSearchIndexConfig};
/// let config = OpenSearchIndexConfig::new("social_messages_master", crawlers);
/// let index = OpenSearchIndex::connect("http://localhost:9200", config, source).await?;
/// index.ensure_index_exists().await?;
/// ```
pub struct OpenSearchIndex {
    client: OpenSearch,
    config: OpenSearchIndexConfig,
    source: Arc<dyn DocumentSource>,
}

impl OpenSearchIndex {
    /// Create a new OpenSearch index connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `config` - The index configuration
    /// * `source` - Where re-indexed documents are read from
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchIndex)` - A new index instance
    /// * `Err(SocialSearchError)` - If connection setup fails
    pub async fn connect(
        url: &str,
        config: OpenSearchIndexConfig,
        source: Arc<dyn DocumentSource>,
    ) -> Result<Self, SocialSearchError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SocialSearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SocialSearchError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            index = %config.name,
            "Created OpenSearch index"
        );

        Ok(Self {
            client,
            config,
            source,
        })
    }

    /// Create the index with the social messages mappings unless it already exists.
    pub async fn ensure_index_exists(&self) -> Result<(), SocialSearchError> {
        let exists = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[&self.config.name]))
            .send()
            .await
            .map_err(|e| SocialSearchError::connection(e.to_string()))?;

        if exists.status_code().is_success() {
            debug!(index = %self.config.name, "Index already exists");
            return Ok(());
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&self.config.name))
            .body(get_index_settings())
            .send()
            .await
            .map_err(|e| SocialSearchError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index creation failed");
            return Err(SocialSearchError::index_creation(format!(
                "Creating index '{}' failed with status {}: {}",
                self.config.name, status, error_body
            )));
        }

        info!(index = %self.config.name, "Index created");
        Ok(())
    }

    async fn put_document(
        &self,
        doc_id: &str,
        document: &SearchDocument,
    ) -> Result<(), SocialSearchError> {
        let response = self
            .client
            .index(IndexParts::IndexId(&self.config.name, doc_id))
            .refresh(Refresh::True)
            .body(document)
            .send()
            .await
            .map_err(|e| SocialSearchError::update(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index request failed");
            return Err(SocialSearchError::update(format!(
                "Index failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(doc_id = %doc_id, "Document indexed");
        Ok(())
    }

    async fn delete_document(&self, doc_id: &str) -> Result<(), SocialSearchError> {
        let response = self
            .client
            .delete(DeleteParts::IndexId(&self.config.name, doc_id))
            .refresh(Refresh::True)
            .send()
            .await
            .map_err(|e| SocialSearchError::update(e.to_string()))?;

        let status = response.status_code();

        // 404 is acceptable - the item was never indexed
        if !status.is_success() && status.as_u16() != 404 {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Delete request failed");
            return Err(SocialSearchError::update(format!(
                "Delete failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(doc_id = %doc_id, "Document deleted");
        Ok(())
    }
}

#[async_trait]
impl SearchIndex for OpenSearchIndex {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn crawlers(&self) -> &[Crawler] {
        &self.config.crawlers
    }

    /// Open a search session.
    ///
    /// The index stores no per-item access rules, so every session sees every document
    /// whatever `security` asks for.
    async fn open_session(
        &self,
        security: SecurityOptions,
    ) -> Result<Box<dyn SearchSession>, SocialSearchError> {
        if security == SecurityOptions::EnableSecurityCheck {
            warn!(index = %self.config.name, "Security checks are not enforced by OpenSearch sessions");
        }

        Ok(Box::new(OpenSearchSession {
            client: self.client.clone(),
            index_name: self.config.name.clone(),
            page_size: self.config.page_size.max(1),
        }))
    }

    /// Re-index one item from the document source, synchronously.
    ///
    /// The write is refreshed before returning so the next session observes it. An item
    /// without a document is removed from the index.
    async fn update(
        &self,
        uri: &ItemUri,
        options: IndexingOptions,
    ) -> Result<(), SocialSearchError> {
        let doc_id = uri.document_id();
        let document = self
            .source
            .document(uri)
            .await
            .map_err(|e| SocialSearchError::update(format!("Failed to crawl {}: {}", uri, e)))?;

        match document {
            Some(document) => self.put_document(&doc_id, &document).await?,
            None => self.delete_document(&doc_id).await?,
        }

        debug!(index = %self.config.name, uri = %uri, options = ?options, "Item re-indexed");
        Ok(())
    }
}

/// Search session over an [`OpenSearchIndex`].
///
/// Searches sort on `item_id` and page with `search_after` until a short page comes
/// back, so no hit is dropped whatever the size of the result.
pub struct OpenSearchSession {
    client: OpenSearch,
    index_name: String,
    page_size: i64,
}

impl OpenSearchSession {
    async fn search_page(&self, body: Value) -> Result<Value, SocialSearchError> {
        let response = self
            .client
            .search(SearchParts::Index(&[&self.index_name]))
            .size(self.page_size)
            .body(body)
            .send()
            .await
            .map_err(|e| SocialSearchError::query(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Search request failed");
            return Err(SocialSearchError::query(format!(
                "Search on '{}' failed with status {}: {}",
                self.index_name, status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| SocialSearchError::query(e.to_string()))
    }
}

#[async_trait]
impl SearchSession for OpenSearchSession {
    async fn search(&self, predicate: &Predicate) -> Result<Vec<SearchDocument>, SocialSearchError> {
        let query = to_query_dsl(predicate);
        let mut documents = Vec::new();
        let mut after: Option<Value> = None;
        let mut pages = 0usize;

        loop {
            let response_body = self.search_page(search_body(&query, after.as_ref())).await?;
            let page = parse_page(&response_body, self.page_size)?;
            pages += 1;
            documents.extend(page.documents);

            match page.search_after {
                Some(next) => after = Some(next),
                None => break,
            }
        }

        debug!(index = %self.index_name, hits = documents.len(), pages, "Search complete");
        Ok(documents)
    }
}

/// Request body for one page, sorted on `item_id` and resuming after `after`.
fn search_body(query: &Value, after: Option<&Value>) -> Value {
    let mut body = json!({
        "query": query,
        "sort": [{ "item_id": "asc" }]
    });
    if let Some(after) = after {
        body["search_after"] = after.clone();
    }
    body
}

/// Documents of one page and the cursor of the next one.
#[derive(Debug)]
struct SearchPage {
    documents: Vec<SearchDocument>,
    /// `None` once the page is short, i.e. the last one.
    search_after: Option<Value>,
}

/// Split a search response into its documents and the `search_after` cursor.
///
/// A full page without sort values cannot be continued and is an error rather than a
/// silently truncated result.
fn parse_page(response_body: &Value, page_size: i64) -> Result<SearchPage, SocialSearchError> {
    let documents = parse_hits(response_body)?;

    if (documents.len() as i64) < page_size {
        return Ok(SearchPage {
            documents,
            search_after: None,
        });
    }

    let sort = response_body["hits"]["hits"]
        .as_array()
        .and_then(|hits| hits.last())
        .map(|hit| &hit["sort"])
        .filter(|sort| sort.is_array());

    match sort {
        Some(sort) => Ok(SearchPage {
            documents,
            search_after: Some(sort.clone()),
        }),
        None => Err(SocialSearchError::query(format!(
            "Search returned a full page of {} hits without sort values; results would be truncated",
            page_size
        ))),
    }
}

/// Extract the `_source` documents of a search response.
fn parse_hits(response_body: &Value) -> Result<Vec<SearchDocument>, SocialSearchError> {
    let Some(hits) = response_body["hits"]["hits"].as_array() else {
        return Ok(Vec::new());
    };

    hits.iter()
        .map(|hit| {
            serde_json::from_value(hit["_source"].clone()).map_err(|e| {
                SocialSearchError::parse(format!(
                    "Invalid document '{}': {}",
                    hit["_id"].as_str().unwrap_or_default(),
                    e
                ))
            })
        })
        .collect()
}
