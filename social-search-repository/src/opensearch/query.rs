//! Translation of [`Predicate`]s into the OpenSearch query DSL.

use serde_json::{json, Value};
use social_search_shared::{FieldValue, SearchField};

use crate::filters::Predicate;

/// Build the `query` clause matching exactly the documents `predicate` matches.
///
/// All clauses run in filter context; scoring is irrelevant to identifier queries.
pub fn to_query_dsl(predicate: &Predicate) -> Value {
    match predicate {
        Predicate::Const(true) => json!({ "match_all": {} }),
        Predicate::Const(false) => json!({ "bool": { "must_not": [{ "match_all": {} }] } }),
        Predicate::Eq(field, value) => equals(*field, value),
        Predicate::Ne(field, value) => json!({ "bool": { "must_not": [equals(*field, value)] } }),
        Predicate::And(left, right) => json!({
            "bool": { "filter": [to_query_dsl(left), to_query_dsl(right)] }
        }),
        Predicate::Or(left, right) => json!({
            "bool": {
                "should": [to_query_dsl(left), to_query_dsl(right)],
                "minimum_should_match": 1
            }
        }),
    }
}

fn equals(field: SearchField, value: &FieldValue) -> Value {
    let name = field.name();
    match value {
        // Absent fields are not indexed.
        FieldValue::Missing => json!({ "bool": { "must_not": [{ "exists": { "field": name } }] } }),
        FieldValue::Identifier(id) => json!({ "term": { name: id.to_string() } }),
        FieldValue::Text(text) => json!({ "term": { name: text } }),
        FieldValue::Date(date) => json!({ "term": { name: date.format("%Y-%m-%d").to_string() } }),
        FieldValue::Bool(flag) => json!({ "term": { name: flag } }),
    }
}
