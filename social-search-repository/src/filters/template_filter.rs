//! Template filters built from configuration.
//!
//! A document "is a message" or "is a posting configuration" when its template id belongs
//! to the set of template ids found in the corresponding configuration section. Filters
//! are rebuilt on every call; the sections are small.

use std::sync::Arc;

use social_search_shared::{
    Identifier, NetworksConfiguration, PostingConfigurationsConfiguration, SearchField,
};

use crate::errors::SocialSearchError;
use crate::filters::Predicate;
use crate::interfaces::{ConfigurationProvider, ConfigurationProviderExt};

/// Build a predicate accepting documents whose template id is one of `template_ids`.
///
/// An empty set yields a predicate that rejects every document.
pub fn template_filter(template_ids: impl IntoIterator<Item = Identifier>) -> Predicate {
    Predicate::any_of(
        template_ids
            .into_iter()
            .map(|template_id| Predicate::eq(SearchField::TemplateId, template_id)),
    )
    .unwrap_or_else(Predicate::never)
}

/// Parse a template id taken from configuration.
pub fn parse_template_id(raw: &str) -> Result<Identifier, SocialSearchError> {
    Identifier::parse(raw).map_err(|e| {
        SocialSearchError::configuration(format!("Invalid template id '{}': {}", raw, e))
    })
}

/// Message template ids across all configured networks.
pub fn message_template_ids(
    networks: &NetworksConfiguration,
) -> Result<Vec<Identifier>, SocialSearchError> {
    networks
        .networks
        .iter()
        .flat_map(|network| network.items.iter())
        .map(|message| parse_template_id(&message.message_template_id))
        .collect()
}

/// Template ids of all configured posting configurations.
pub fn posting_configuration_template_ids(
    posting_configurations: &PostingConfigurationsConfiguration,
) -> Result<Vec<Identifier>, SocialSearchError> {
    posting_configurations
        .posting_configurations
        .iter()
        .map(|posting_configuration| parse_template_id(&posting_configuration.template_id))
        .collect()
}

/// Builds the "is-message" and "is-posting-configuration" predicates from a
/// configuration provider.
#[derive(Clone)]
pub struct TemplateFilters {
    configuration: Arc<dyn ConfigurationProvider>,
}

impl TemplateFilters {
    pub fn new(configuration: Arc<dyn ConfigurationProvider>) -> Self {
        Self { configuration }
    }

    /// Documents whose template is a message type of any configured network.
    pub fn is_message(&self) -> Result<Predicate, SocialSearchError> {
        let networks = self.configuration.get::<NetworksConfiguration>()?;
        Ok(template_filter(message_template_ids(&networks)?))
    }

    /// Documents whose template is any configured posting configuration type.
    pub fn is_posting_configuration(&self) -> Result<Predicate, SocialSearchError> {
        let posting_configurations = self
            .configuration
            .get::<PostingConfigurationsConfiguration>()?;
        Ok(template_filter(posting_configuration_template_ids(
            &posting_configurations,
        )?))
    }

    /// Template id of the single posting configuration named exactly `name`.
    ///
    /// # Returns
    ///
    /// * `Ok(Identifier)` - The template id
    /// * `Err(SocialSearchError::ConfigurationError)` - If zero or several posting
    ///   configurations carry that name, or the id does not parse
    pub fn posting_configuration_template_id(
        &self,
        name: &str,
    ) -> Result<Identifier, SocialSearchError> {
        let posting_configurations = self
            .configuration
            .get::<PostingConfigurationsConfiguration>()?;

        let mut matching = posting_configurations
            .posting_configurations
            .iter()
            .filter(|posting_configuration| posting_configuration.name == name);

        match (matching.next(), matching.next()) {
            (Some(posting_configuration), None) => {
                parse_template_id(&posting_configuration.template_id)
            }
            (None, _) => Err(SocialSearchError::configuration(format!(
                "No posting configuration named '{}' is configured",
                name
            ))),
            (Some(_), Some(_)) => Err(SocialSearchError::configuration(format!(
                "More than one posting configuration is named '{}'",
                name
            ))),
        }
    }
}
