//! Term query - exact match on a field

use crate::query::ast::QueryNode;
use crate::query::types::FieldValue;
use serde::{Deserialize, Serialize};

/// Query that matches documents whose field holds exactly one value
///
/// Keyword, numeric, date and boolean equality all compile to this node;
/// the literal's type is carried by [`FieldValue`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TermQuery {
    /// Field to search in
    pub field: String,
    /// Exact value to match
    pub value: FieldValue,
}

impl TermQuery {
    /// Create a new term query
    pub fn new(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl QueryNode for TermQuery {
    fn query_type(&self) -> &'static str {
        "term"
    }

    fn is_scoring(&self) -> bool {
        false
    }

    fn field(&self) -> Option<&str> {
        Some(&self.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_query_creation() {
        let query = TermQuery::new("status", "published");
        assert_eq!(query.field, "status");
        assert_eq!(query.value, FieldValue::Text("published".to_string()));
        assert_eq!(query.query_type(), "term");
        assert!(!query.is_scoring());
    }

    #[test]
    fn test_term_query_typed_values() {
        assert_eq!(TermQuery::new("age", 42_i64).value, FieldValue::Long(42));
        assert_eq!(TermQuery::new("flag", false).value, FieldValue::Bool(false));
    }
}
