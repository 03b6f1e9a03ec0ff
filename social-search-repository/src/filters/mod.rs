//! Predicates over search documents and the configuration-driven template filters.

mod predicate;
mod template_filter;

pub use predicate::Predicate;
pub use template_filter::{
    message_template_ids, parse_template_id, posting_configuration_template_ids,
    template_filter, TemplateFilters,
};
