//! Boolean predicates over [`SearchDocument`]s.
//!
//! A predicate is a small expression tree. The in-memory backend evaluates it with
//! [`Predicate::matches`]; other backends translate it into their own query language.

use social_search_shared::{FieldValue, SearchDocument, SearchField};

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every document (`true`) or none (`false`).
    Const(bool),

    Eq(SearchField, FieldValue),

    Ne(SearchField, FieldValue),

    And(Box<Predicate>, Box<Predicate>),

    Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    pub fn always() -> Self {
        Predicate::Const(true)
    }

    pub fn never() -> Self {
        Predicate::Const(false)
    }

    pub fn eq(field: SearchField, value: impl Into<FieldValue>) -> Self {
        Predicate::Eq(field, value.into())
    }

    pub fn ne(field: SearchField, value: impl Into<FieldValue>) -> Self {
        Predicate::Ne(field, value.into())
    }

    /// `field == true`, for boolean fields.
    pub fn is_true(field: SearchField) -> Self {
        Predicate::Eq(field, FieldValue::Bool(true))
    }

    pub fn and(self, other: Predicate) -> Self {
        Predicate::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Predicate) -> Self {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    /// Left-associative disjunction of `clauses`: `((a OR b) OR c) ...`.
    ///
    /// Returns `None` for an empty iterator; callers decide whether "no clauses" means
    /// match nothing or omit the filter.
    pub fn any_of(clauses: impl IntoIterator<Item = Predicate>) -> Option<Self> {
        clauses.into_iter().reduce(Predicate::or)
    }

    /// Evaluate the predicate against a document.
    pub fn matches(&self, document: &SearchDocument) -> bool {
        match self {
            Predicate::Const(value) => *value,
            Predicate::Eq(field, value) => document.value(*field) == *value,
            Predicate::Ne(field, value) => document.value(*field) != *value,
            Predicate::And(left, right) => left.matches(document) && right.matches(document),
            Predicate::Or(left, right) => left.matches(document) || right.matches(document),
        }
    }
}
