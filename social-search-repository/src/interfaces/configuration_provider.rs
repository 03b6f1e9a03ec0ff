//! Configuration provider trait definition.

use serde_json::Value;
use social_search_shared::ConfigurationSection;

use crate::errors::SocialSearchError;

/// Source of read-only configuration sections.
///
/// Implementations return the raw section; typed access goes through
/// [`ConfigurationProviderExt::get`].
pub trait ConfigurationProvider: Send + Sync {
    /// Return the raw value of the section named `name`.
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The section content
    /// * `Err(SocialSearchError::ConfigurationError)` - If the section does not exist
    fn section(&self, name: &str) -> Result<Value, SocialSearchError>;
}

/// Typed access to configuration sections.
pub trait ConfigurationProviderExt {
    /// Load and deserialize the section `T`.
    fn get<T: ConfigurationSection>(&self) -> Result<T, SocialSearchError>;
}

impl<P: ConfigurationProvider + ?Sized> ConfigurationProviderExt for P {
    fn get<T: ConfigurationSection>(&self) -> Result<T, SocialSearchError> {
        let value = self.section(T::SECTION)?;
        serde_json::from_value(value).map_err(|e| {
            SocialSearchError::configuration(format!(
                "Invalid '{}' configuration section: {}",
                T::SECTION,
                e
            ))
        })
    }
}
