//! Query tree representation
//!
//! This module defines the `Query` enum produced by the compiler and the
//! `QueryNode` trait every node implements, giving downstream renderers a
//! uniform view of node kind, field and scoring behaviour.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use super::nodes::{BoolQuery, ExistsQuery, MatchQuery, PhraseQuery, RangeQuery, TermQuery};

/// Common interface of all query nodes in the tree
pub trait QueryNode: Debug {
    /// Get the query type name for debugging and logging
    fn query_type(&self) -> &'static str;

    /// Whether this query is relevance-scored (vs just filtering)
    ///
    /// Scored queries analyze free text; they are the ones a filter context
    /// refuses.
    fn is_scoring(&self) -> bool {
        true
    }

    /// Field the query targets, if it is a leaf
    fn field(&self) -> Option<&str> {
        None
    }
}

/// One node of a compiled query tree
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    Term(TermQuery),
    Match(MatchQuery),
    #[serde(rename = "match_phrase")]
    Phrase(PhraseQuery),
    Range(RangeQuery),
    Exists(ExistsQuery),
    Bool(BoolQuery),
}

impl Query {
    /// Borrow the concrete node behind this variant
    pub fn node(&self) -> &dyn QueryNode {
        match self {
            Query::Term(q) => q,
            Query::Match(q) => q,
            Query::Phrase(q) => q,
            Query::Range(q) => q,
            Query::Exists(q) => q,
            Query::Bool(q) => q,
        }
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self, Query::Bool(_))
    }

    pub fn as_bool(&self) -> Option<&BoolQuery> {
        match self {
            Query::Bool(q) => Some(q),
            _ => None,
        }
    }

    /// Equality that ignores clause order inside nested boolean queries
    pub fn equivalent_to(&self, other: &Query) -> bool {
        match (self, other) {
            (Query::Bool(left), Query::Bool(right)) => left.equivalent_to(right),
            _ => self == other,
        }
    }
}

impl QueryNode for Query {
    fn query_type(&self) -> &'static str {
        self.node().query_type()
    }

    fn is_scoring(&self) -> bool {
        self.node().is_scoring()
    }

    fn field(&self) -> Option<&str> {
        self.node().field()
    }
}

impl From<TermQuery> for Query {
    fn from(query: TermQuery) -> Self {
        Query::Term(query)
    }
}

impl From<MatchQuery> for Query {
    fn from(query: MatchQuery) -> Self {
        Query::Match(query)
    }
}

impl From<PhraseQuery> for Query {
    fn from(query: PhraseQuery) -> Self {
        Query::Phrase(query)
    }
}

impl From<RangeQuery> for Query {
    fn from(query: RangeQuery) -> Self {
        Query::Range(query)
    }
}

impl From<ExistsQuery> for Query {
    fn from(query: ExistsQuery) -> Self {
        Query::Exists(query)
    }
}

impl From<BoolQuery> for Query {
    fn from(query: BoolQuery) -> Self {
        Query::Bool(query)
    }
}
