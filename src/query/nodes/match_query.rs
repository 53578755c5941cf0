//! Match query - full-text search on analyzed text

use crate::query::ast::QueryNode;
use serde::{Deserialize, Serialize};

/// Query that matches documents by relevance against free text
///
/// Match queries are relevance-scored, so they are refused (or downgraded to
/// a term query) when compiling for a filter context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchQuery {
    /// Field to search in
    pub field: String,
    /// Free text to analyze and match
    pub text: String,
}

impl MatchQuery {
    /// Create a new match query
    pub fn new(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            text: text.into(),
        }
    }
}

impl QueryNode for MatchQuery {
    fn query_type(&self) -> &'static str {
        "match"
    }

    fn field(&self) -> Option<&str> {
        Some(&self.field)
    }
}
