//! Search document types for the social search index.
//!
//! Messages and their posting configurations are indexed as separate documents sharing
//! one flattened shape. Fields that do not apply to a document keep their empty value
//! (`Identifier::EMPTY`, `false`, or the unposted sentinel date).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::identifier::Identifier;

/// The sentinel date stored in `message_posted_date` for messages that were never posted
/// (`0001-01-01`). Created dates use the same value when unknown.
pub fn unposted_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Document representation for the social search index.
///
/// # Fields
///
/// - `item_id`: Identifier of the underlying entity
/// - `template_id`: Template (schema) the entity conforms to
/// - `container`: Normalized container path, see [`crate::normalize_container`]
/// - `account_id`: Account a posting configuration targets
/// - `workflow_state_id`: Current workflow state, or `Identifier::EMPTY`
/// - `final_workflow_state`: Whether the workflow state is final
/// - `message_posted_date` / `message_created_date`: Day-precision dates
/// - `post_automatically`: Whether the posting configuration posts without user action
/// - `item_published`: Whether the entity is published
/// - `parent_id`: Item id of the parent document (the owning message for posting configurations)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchDocument {
    pub item_id: Identifier,
    pub template_id: Identifier,
    #[serde(default)]
    pub container: String,
    #[serde(default)]
    pub account_id: Identifier,
    #[serde(default)]
    pub workflow_state_id: Identifier,
    #[serde(default)]
    pub final_workflow_state: bool,
    #[serde(default = "unposted_date")]
    pub message_posted_date: NaiveDate,
    #[serde(default = "unposted_date")]
    pub message_created_date: NaiveDate,
    #[serde(default)]
    pub post_automatically: bool,
    #[serde(default)]
    pub item_published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Identifier>,
}

impl SearchDocument {
    /// Create a document with every optional field at its empty value.
    ///
    /// # Example
    ///
    /// ```
    /// use social_search_shared::{Identifier, SearchDocument};
    ///
    /// let message = SearchDocument {
    ///     final_workflow_state: true,
    ///     ..SearchDocument::new(Identifier::new_v4(), Identifier::new_v4())
    /// };
    /// assert!(!message.is_posted());
    /// ```
    pub fn new(item_id: Identifier, template_id: Identifier) -> Self {
        Self {
            item_id,
            template_id,
            container: String::new(),
            account_id: Identifier::EMPTY,
            workflow_state_id: Identifier::EMPTY,
            final_workflow_state: false,
            message_posted_date: unposted_date(),
            message_created_date: unposted_date(),
            post_automatically: false,
            item_published: false,
            parent_id: None,
        }
    }

    /// Returns true when the posted date differs from the unposted sentinel.
    pub fn is_posted(&self) -> bool {
        self.message_posted_date != unposted_date()
    }

    /// Read a field as a comparable value.
    pub fn value(&self, field: SearchField) -> FieldValue {
        match field {
            SearchField::ItemId => FieldValue::Identifier(self.item_id),
            SearchField::TemplateId => FieldValue::Identifier(self.template_id),
            SearchField::Container => FieldValue::Text(self.container.clone()),
            SearchField::AccountId => FieldValue::Identifier(self.account_id),
            SearchField::WorkflowStateId => FieldValue::Identifier(self.workflow_state_id),
            SearchField::FinalWorkflowState => FieldValue::Bool(self.final_workflow_state),
            SearchField::MessagePostedDate => FieldValue::Date(self.message_posted_date),
            SearchField::MessageCreatedDate => FieldValue::Date(self.message_created_date),
            SearchField::PostAutomatically => FieldValue::Bool(self.post_automatically),
            SearchField::ItemPublished => FieldValue::Bool(self.item_published),
            SearchField::ParentId => self
                .parent_id
                .map(FieldValue::Identifier)
                .unwrap_or(FieldValue::Missing),
        }
    }
}

/// Queryable fields of a [`SearchDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    ItemId,
    TemplateId,
    Container,
    AccountId,
    WorkflowStateId,
    FinalWorkflowState,
    MessagePostedDate,
    MessageCreatedDate,
    PostAutomatically,
    ItemPublished,
    ParentId,
}

impl SearchField {
    /// Name of the field in the serialized document and in index mappings.
    pub fn name(&self) -> &'static str {
        match self {
            SearchField::ItemId => "item_id",
            SearchField::TemplateId => "template_id",
            SearchField::Container => "container",
            SearchField::AccountId => "account_id",
            SearchField::WorkflowStateId => "workflow_state_id",
            SearchField::FinalWorkflowState => "final_workflow_state",
            SearchField::MessagePostedDate => "message_posted_date",
            SearchField::MessageCreatedDate => "message_created_date",
            SearchField::PostAutomatically => "post_automatically",
            SearchField::ItemPublished => "item_published",
            SearchField::ParentId => "parent_id",
        }
    }
}

/// A field value as compared by predicates.
///
/// `Missing` is only produced for an absent `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Identifier(Identifier),
    Text(String),
    Date(NaiveDate),
    Bool(bool),
    Missing,
}

impl From<Identifier> for FieldValue {
    fn from(value: Identifier) -> Self {
        FieldValue::Identifier(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_defaults() {
        let item_id = Identifier::new_v4();
        let template_id = Identifier::new_v4();

        let doc = SearchDocument::new(item_id, template_id);

        assert_eq!(doc.item_id, item_id);
        assert_eq!(doc.template_id, template_id);
        assert!(doc.account_id.is_empty());
        assert!(doc.workflow_state_id.is_empty());
        assert!(!doc.is_posted());
        assert_eq!(doc.message_created_date, unposted_date());
        assert!(doc.parent_id.is_none());
    }

    #[test]
    fn test_unposted_date_is_year_one() {
        assert_eq!(unposted_date().to_string(), "0001-01-01");
    }

    #[test]
    fn test_value_of_missing_parent() {
        let doc = SearchDocument::new(Identifier::new_v4(), Identifier::new_v4());
        assert_eq!(doc.value(SearchField::ParentId), FieldValue::Missing);

        let parent = Identifier::new_v4();
        let child = SearchDocument {
            parent_id: Some(parent),
            ..doc
        };
        assert_eq!(
            child.value(SearchField::ParentId),
            FieldValue::Identifier(parent)
        );
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let json = r#"{
            "item_id": "550e8400-e29b-41d4-a716-446655440000",
            "template_id": "6ba7b810-9dad-11d1-80b4-00c04fd430c8",
            "message_posted_date": "2024-03-01"
        }"#;

        let doc: SearchDocument = serde_json::from_str(json).unwrap();

        assert!(doc.is_posted());
        assert_eq!(doc.message_created_date, unposted_date());
        assert!(!doc.item_published);
        assert!(doc.container.is_empty());
    }

    #[test]
    fn test_serialization_skips_missing_parent() {
        let doc = SearchDocument::new(Identifier::new_v4(), Identifier::new_v4());
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("parent_id").is_none());
        assert_eq!(json["message_posted_date"], "0001-01-01");
    }
}
