//! Exists query - matches documents that have any value for a field

use crate::query::ast::QueryNode;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExistsQuery {
    pub field: String,
}

impl ExistsQuery {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl QueryNode for ExistsQuery {
    fn query_type(&self) -> &'static str {
        "exists"
    }

    fn is_scoring(&self) -> bool {
        false
    }

    fn field(&self) -> Option<&str> {
        Some(&self.field)
    }
}
