//! Configuration sections consumed by the social search service.
//!
//! Sections are plain serde structures. Template ids are kept as the strings found in
//! configuration and parsed by the consumer, so one malformed id surfaces as a
//! configuration error at the point of use.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A typed configuration section stored under a fixed name.
pub trait ConfigurationSection: DeserializeOwned {
    /// Name of the section in the configuration document.
    const SECTION: &'static str;
}

/// Social networks and the message types each one supports.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct NetworksConfiguration {
    pub networks: Vec<NetworkSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkSettings {
    pub name: String,
    #[serde(default)]
    pub items: Vec<MessageSettings>,
}

/// A message type of a network.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageSettings {
    pub name: String,
    pub message_template_id: String,
}

impl ConfigurationSection for NetworksConfiguration {
    const SECTION: &'static str = "networks";
}

/// Posting configuration types, e.g. `ContentPosting`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PostingConfigurationsConfiguration {
    pub posting_configurations: Vec<PostingConfigurationSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostingConfigurationSettings {
    pub name: String,
    pub template_id: String,
}

impl ConfigurationSection for PostingConfigurationsConfiguration {
    const SECTION: &'static str = "posting_configurations";
}

/// General settings of the social module.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettingsConfiguration {
    /// Path of the item under which all messages are stored.
    pub messages_root_path: String,
    /// Name of the messages index for the authoring partition.
    pub messages_search_index_master: String,
    /// Name of the messages index for the delivery partition.
    pub messages_search_index_web: String,
    /// Base template shared by all posting configuration templates.
    pub posting_configuration_base_template_id: String,
}

impl SettingsConfiguration {
    /// Returns true if `name` is one of the two configured messages index names.
    pub fn is_messages_index(&self, name: &str) -> bool {
        name == self.messages_search_index_master || name == self.messages_search_index_web
    }
}

impl ConfigurationSection for SettingsConfiguration {
    const SECTION: &'static str = "settings";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_networks_section_is_a_list() {
        let json = r#"[
            {"name": "Twitter", "items": [{"name": "Tweet", "message_template_id": "t1"}]},
            {"name": "Facebook"}
        ]"#;

        let config: NetworksConfiguration = serde_json::from_str(json).unwrap();

        assert_eq!(config.networks.len(), 2);
        assert_eq!(config.networks[0].items[0].message_template_id, "t1");
        assert!(config.networks[1].items.is_empty());
    }

    #[test]
    fn test_is_messages_index() {
        let settings = SettingsConfiguration {
            messages_root_path: "/social/messages".to_string(),
            messages_search_index_master: "social_messages_master".to_string(),
            messages_search_index_web: "social_messages_web".to_string(),
            posting_configuration_base_template_id: String::new(),
        };

        assert!(settings.is_messages_index("social_messages_master"));
        assert!(settings.is_messages_index("social_messages_web"));
        assert!(!settings.is_messages_index("sitecore_master_index"));
        assert!(!settings.is_messages_index("Social_Messages_Web"));
    }
}
