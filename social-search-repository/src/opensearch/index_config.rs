//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for the social messages index.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::types::Crawler;

/// Hits fetched per search request. Searches page until every hit is read.
pub const DEFAULT_PAGE_SIZE: i64 = 1_000;

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Configuration for one OpenSearch-backed index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenSearchIndexConfig {
    /// The index name, also used for all OpenSearch operations.
    pub name: String,
    /// Crawlers feeding the index.
    #[serde(default)]
    pub crawlers: Vec<Crawler>,
    /// Number of hits requested per page of a session search.
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl OpenSearchIndexConfig {
    /// Create a new index configuration.
    ///
    /// # Arguments
    ///
    /// * `name` - The index name
    /// * `crawlers` - Crawlers feeding the index
    pub fn new(name: impl Into<String>, crawlers: Vec<Crawler>) -> Self {
        Self {
            name: name.into(),
            crawlers,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Get the index settings and mappings for the social messages index.
///
/// The configuration includes:
/// - **Keyword fields**: identifiers and the normalized container, matched exactly
/// - **Date fields**: day-precision dates in `yyyy-MM-dd` format
/// - **Boolean fields**: workflow, posting and publishing flags
pub fn get_index_settings() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": {
                "item_id": { "type": "keyword" },
                "template_id": { "type": "keyword" },
                "container": { "type": "keyword" },
                "account_id": { "type": "keyword" },
                "workflow_state_id": { "type": "keyword" },
                "parent_id": { "type": "keyword" },
                "final_workflow_state": { "type": "boolean" },
                "post_automatically": { "type": "boolean" },
                "item_published": { "type": "boolean" },
                "message_posted_date": { "type": "date", "format": "yyyy-MM-dd" },
                "message_created_date": { "type": "date", "format": "yyyy-MM-dd" }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_settings_structure() {
        let settings = get_index_settings();

        assert!(settings["settings"]["number_of_shards"].is_number());

        let properties = &settings["mappings"]["properties"];
        assert_eq!(properties["template_id"]["type"], "keyword");
        assert_eq!(properties["container"]["type"], "keyword");
        assert_eq!(properties["item_published"]["type"], "boolean");
        assert_eq!(properties["message_posted_date"]["format"], "yyyy-MM-dd");
    }

    #[test]
    fn test_config_defaults() {
        let config: OpenSearchIndexConfig =
            serde_json::from_value(json!({"name": "social_messages_master"})).unwrap();

        assert_eq!(config, OpenSearchIndexConfig::new("social_messages_master", vec![]));
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }
}
