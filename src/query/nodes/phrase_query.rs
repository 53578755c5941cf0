//! Phrase query - matches an exact sequence of analyzed terms

use crate::query::ast::QueryNode;
use serde::{Deserialize, Serialize};

/// Query that matches documents containing a quoted phrase
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhraseQuery {
    /// Field to search in
    pub field: String,
    /// Phrase text, without surrounding quotes
    pub phrase: String,
}

impl PhraseQuery {
    /// Create a new phrase query
    pub fn new(field: impl Into<String>, phrase: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            phrase: phrase.into(),
        }
    }

    /// Number of whitespace-separated words in the phrase
    pub fn word_count(&self) -> usize {
        self.phrase.split_whitespace().count()
    }
}

impl QueryNode for PhraseQuery {
    fn query_type(&self) -> &'static str {
        "match_phrase"
    }

    fn field(&self) -> Option<&str> {
        Some(&self.field)
    }
}
