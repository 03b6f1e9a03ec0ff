//! In-memory search index.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use social_search_shared::{Identifier, SearchDocument};
use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::SocialSearchError;
use crate::filters::Predicate;
use crate::interfaces::{DocumentSource, SearchIndex, SearchSession};
use crate::types::{Crawler, IndexingOptions, ItemUri, SecurityOptions};

type Documents = Arc<RwLock<HashMap<Identifier, SearchDocument>>>;

/// Search index evaluating predicates over documents held in memory.
///
/// Tracks the sessions it hands out so callers can verify that every session was
/// released. Bookkeeping is constant-size: counters and the options of the last session.
pub struct InMemorySearchIndex {
    name: String,
    crawlers: Vec<Crawler>,
    source: Arc<dyn DocumentSource>,
    documents: Documents,
    open_sessions: Arc<AtomicUsize>,
    sessions_opened: AtomicUsize,
    last_security: Mutex<Option<SecurityOptions>>,
}

impl InMemorySearchIndex {
    /// Create an empty index fed by `source`.
    pub fn new(
        name: impl Into<String>,
        crawlers: Vec<Crawler>,
        source: Arc<dyn DocumentSource>,
    ) -> Self {
        Self {
            name: name.into(),
            crawlers,
            source,
            documents: Arc::new(RwLock::new(HashMap::new())),
            open_sessions: Arc::new(AtomicUsize::new(0)),
            sessions_opened: AtomicUsize::new(0),
            last_security: Mutex::new(None),
        }
    }

    /// Create an index already containing `documents`.
    pub fn with_documents(
        name: impl Into<String>,
        crawlers: Vec<Crawler>,
        source: Arc<dyn DocumentSource>,
        documents: impl IntoIterator<Item = SearchDocument>,
    ) -> Self {
        let index = Self::new(name, crawlers, source);
        let documents = documents
            .into_iter()
            .map(|document| (document.item_id, document))
            .collect();
        Self {
            documents: Arc::new(RwLock::new(documents)),
            ..index
        }
    }

    /// Number of sessions opened and not yet released.
    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }

    /// Number of sessions opened since creation.
    pub fn sessions_opened(&self) -> usize {
        self.sessions_opened.load(Ordering::SeqCst)
    }

    /// Security options of the most recently opened session.
    pub fn last_security_options(&self) -> Option<SecurityOptions> {
        self.last_security.lock().ok().and_then(|last| *last)
    }

    /// Number of documents in the index.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl SearchIndex for InMemorySearchIndex {
    fn name(&self) -> &str {
        &self.name
    }

    fn crawlers(&self) -> &[Crawler] {
        &self.crawlers
    }

    async fn open_session(
        &self,
        security: SecurityOptions,
    ) -> Result<Box<dyn SearchSession>, SocialSearchError> {
        if let Ok(mut last) = self.last_security.lock() {
            *last = Some(security);
        }
        self.sessions_opened.fetch_add(1, Ordering::SeqCst);
        self.open_sessions.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(InMemorySearchSession {
            documents: Arc::clone(&self.documents),
            open_sessions: Arc::clone(&self.open_sessions),
        }))
    }

    async fn update(
        &self,
        uri: &ItemUri,
        options: IndexingOptions,
    ) -> Result<(), SocialSearchError> {
        let document = self
            .source
            .document(uri)
            .await
            .map_err(|e| SocialSearchError::update(format!("Failed to crawl {}: {}", uri, e)))?;

        let mut documents = self.documents.write().await;
        match document {
            Some(document) => {
                documents.insert(uri.item_id, document);
            }
            None => {
                documents.remove(&uri.item_id);
            }
        }

        debug!(index = %self.name, uri = %uri, options = ?options, "Document re-indexed");
        Ok(())
    }
}

/// Session over an [`InMemorySearchIndex`]. Released on drop.
pub struct InMemorySearchSession {
    documents: Documents,
    open_sessions: Arc<AtomicUsize>,
}

#[async_trait]
impl SearchSession for InMemorySearchSession {
    async fn search(&self, predicate: &Predicate) -> Result<Vec<SearchDocument>, SocialSearchError> {
        let documents = self.documents.read().await;
        let mut matches: Vec<SearchDocument> = documents
            .values()
            .filter(|document| predicate.matches(document))
            .cloned()
            .collect();
        // HashMap order is arbitrary; keep results stable across calls.
        matches.sort_by(|a, b| a.item_id.cmp(&b.item_id));
        Ok(matches)
    }
}

impl Drop for InMemorySearchSession {
    fn drop(&mut self) {
        self.open_sessions.fetch_sub(1, Ordering::SeqCst);
    }
}
