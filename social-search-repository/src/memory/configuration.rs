//! JSON-document configuration provider.

use std::path::Path;

use serde_json::{Map, Value};

use crate::errors::SocialSearchError;
use crate::interfaces::ConfigurationProvider;

/// Configuration provider backed by one JSON object whose top-level keys are sections.
///
/// ```
/// use social_search_repository::memory::JsonConfigurationProvider;
/// use social_search_repository::ConfigurationProviderExt;
/// use social_search_shared::NetworksConfiguration;
///
/// let provider = JsonConfigurationProvider::from_json_str(
///     r#"{"networks": [{"name": "Twitter", "items": []}]}"#,
/// ).unwrap();
/// let networks = provider.get::<NetworksConfiguration>().unwrap();
/// assert_eq!(networks.networks.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonConfigurationProvider {
    sections: Map<String, Value>,
}

impl JsonConfigurationProvider {
    /// Create a provider from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, SocialSearchError> {
        match value {
            Value::Object(sections) => Ok(Self { sections }),
            other => Err(SocialSearchError::configuration(format!(
                "Configuration document must be a JSON object, found: {}",
                other
            ))),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, SocialSearchError> {
        let value = serde_json::from_str(json).map_err(|e| {
            SocialSearchError::configuration(format!("Invalid configuration document: {}", e))
        })?;
        Self::from_value(value)
    }

    /// Load the configuration document from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SocialSearchError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            SocialSearchError::configuration(format!(
                "Failed to read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&json)
    }
}

impl ConfigurationProvider for JsonConfigurationProvider {
    fn section(&self, name: &str) -> Result<Value, SocialSearchError> {
        self.sections.get(name).cloned().ok_or_else(|| {
            SocialSearchError::configuration(format!(
                "Missing '{}' configuration section",
                name
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_section_lookup() {
        let provider = JsonConfigurationProvider::from_value(json!({"settings": {"a": 1}})).unwrap();

        assert_eq!(provider.section("settings").unwrap(), json!({"a": 1}));
        assert!(provider.section("networks").unwrap_err().is_configuration());
    }

    #[test]
    fn test_document_must_be_an_object() {
        assert!(JsonConfigurationProvider::from_value(json!([1, 2])).is_err());
        assert!(JsonConfigurationProvider::from_json_str("not json").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = JsonConfigurationProvider::from_path("/nonexistent/social.json").unwrap_err();
        assert!(err.is_configuration());
    }
}
