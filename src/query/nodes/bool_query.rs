//! Boolean query - combines multiple clauses with AND, OR, NOT semantics

use crate::query::ast::{Query, QueryNode};
use serde::{Deserialize, Serialize};

/// The three clause buckets of a boolean query
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Must,
    MustNot,
    Should,
}

/// Boolean query combining multiple clauses
///
/// The boolean query supports three types of clauses:
/// - `must`: All clauses must match (AND).
/// - `should`: At least one clause should match (OR).
/// - `must_not`: No clause must match (NOT).
///
/// Membership within a bucket is unordered for evaluation; the compiler
/// still appends in parser-encounter order so output is reproducible.
///
/// # Example
///
/// ```json
/// {
///   "bool": {
///     "must": [
///       { "match": { "field": "content", "text": "rust programming" } }
///     ],
///     "should": [
///       { "term": { "field": "tags", "value": "tutorial" } }
///     ],
///     "must_not": [
///       { "term": { "field": "status", "value": "draft" } }
///     ]
///   }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoolQuery {
    /// Clauses that must match (AND)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<Query>,
    /// Clauses that must not match (NOT)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must_not: Vec<Query>,
    /// Clauses where at least one should match (OR)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub should: Vec<Query>,
}

impl BoolQuery {
    /// Create a new empty boolean query
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a must clause
    pub fn must(mut self, query: impl Into<Query>) -> Self {
        self.must.push(query.into());
        self
    }

    /// Add a must_not clause
    pub fn must_not(mut self, query: impl Into<Query>) -> Self {
        self.must_not.push(query.into());
        self
    }

    /// Add a should clause
    pub fn should(mut self, query: impl Into<Query>) -> Self {
        self.should.push(query.into());
        self
    }

    /// Append a clause to the given bucket
    pub fn push(&mut self, bucket: Bucket, query: impl Into<Query>) {
        self.bucket_mut(bucket).push(query.into());
    }

    pub fn bucket(&self, bucket: Bucket) -> &[Query] {
        match bucket {
            Bucket::Must => &self.must,
            Bucket::MustNot => &self.must_not,
            Bucket::Should => &self.should,
        }
    }

    pub fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<Query> {
        match bucket {
            Bucket::Must => &mut self.must,
            Bucket::MustNot => &mut self.must_not,
            Bucket::Should => &mut self.should,
        }
    }

    /// Check if this is an empty query
    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.should.is_empty() && self.must_not.is_empty()
    }

    /// Get total number of clauses
    pub fn clause_count(&self) -> usize {
        self.must.len() + self.should.len() + self.must_not.len()
    }

    /// Nesting depth of boolean queries, counting this one as 1
    pub fn depth(&self) -> usize {
        1 + self
            .clauses()
            .filter_map(|clause| match clause {
                Query::Bool(inner) => Some(inner.depth()),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Iterate over every clause in must, must_not, should order
    pub fn clauses(&self) -> impl Iterator<Item = &Query> {
        self.must
            .iter()
            .chain(self.must_not.iter())
            .chain(self.should.iter())
    }

    /// Structural equality that ignores clause order within each bucket
    pub fn equivalent_to(&self, other: &BoolQuery) -> bool {
        [Bucket::Must, Bucket::MustNot, Bucket::Should]
            .into_iter()
            .all(|bucket| same_members(self.bucket(bucket), other.bucket(bucket)))
    }
}

fn same_members(left: &[Query], right: &[Query]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let mut used = vec![false; right.len()];
    left.iter().all(|candidate| {
        let found = right
            .iter()
            .enumerate()
            .find(|(i, other)| !used[*i] && candidate.equivalent_to(other))
            .map(|(i, _)| i);
        match found {
            Some(i) => {
                used[i] = true;
                true
            }
            None => false,
        }
    })
}

impl QueryNode for BoolQuery {
    fn query_type(&self) -> &'static str {
        "bool"
    }

    /// Scoring if any clause is
    fn is_scoring(&self) -> bool {
        self.clauses().any(|clause| clause.is_scoring())
    }
}
