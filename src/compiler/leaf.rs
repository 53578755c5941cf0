//! Leaf value builder
//!
//! Turns the token events of one comparison (negation, field, range
//! operator, literal) into a typed leaf query. The comparison under
//! construction lives in a single `current` slot; finished leaves and group
//! boundaries are recorded in order so the group composer can take back
//! exactly the leaves of the scope it is closing.

use tracing::trace;

use super::literal;
use crate::config::{CompilerConfig, FilterPolicy};
use crate::error::{CompileError, Result};
use crate::query::ast::{Query, QueryNode};
use crate::query::nodes::{ExistsQuery, MatchQuery, PhraseQuery, RangeQuery, TermQuery};
use crate::query::types::{FieldValue, RangeOp};

/// A finished clause ready to fold into a group frame
///
/// Nested groups travel as leaves too, with a `Query::Bool` payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Leaf {
    pub query: Query,
    pub negate: bool,
}

impl Leaf {
    pub fn new(query: impl Into<Query>, negate: bool) -> Self {
        Self {
            query: query.into(),
            negate,
        }
    }
}

/// Entry in the builder's ordered record
#[derive(Clone, Debug, PartialEq)]
pub enum StackEntry {
    Leaf(Leaf),
    GroupBoundary,
}

/// Comparison under construction
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LeafValue {
    pub field: Option<String>,
    pub range_op: Option<RangeOp>,
    pub negate: bool,
}

impl LeafValue {
    /// Only negations have been seen so far
    fn is_bare(&self) -> bool {
        self.field.is_none() && self.range_op.is_none()
    }
}

#[derive(Debug)]
pub struct LeafBuilder {
    entries: Vec<StackEntry>,
    current: Option<LeafValue>,
    default_field: String,
    filter_context: bool,
    filter_policy: FilterPolicy,
}

impl LeafBuilder {
    pub fn new(config: &CompilerConfig) -> Self {
        Self {
            entries: Vec::new(),
            current: None,
            default_field: config.default_field.clone(),
            filter_context: config.filter_context,
            filter_policy: config.filter_policy,
        }
    }

    /// Negate the comparison being started
    ///
    /// Repeated negations cancel out pairwise: `NOT NOT a` is plain `a`.
    pub fn set_negation(&mut self) -> Result<()> {
        match self.current.as_mut() {
            Some(pending) if pending.is_bare() => pending.negate = !pending.negate,
            Some(pending) => {
                return Err(CompileError::IncompleteComparison {
                    field: pending.field.clone(),
                })
            }
            None => {
                self.current = Some(LeafValue {
                    negate: true,
                    ..Default::default()
                })
            }
        }
        Ok(())
    }

    pub fn set_field(&mut self, name: impl Into<String>) {
        self.current.get_or_insert_with(LeafValue::default).field = Some(name.into());
    }

    /// Attach a comparison operator; the comparison must already name a field
    pub fn set_range_op(&mut self, op: RangeOp) -> Result<()> {
        match self.current.as_mut() {
            Some(pending) if pending.field.is_some() => {
                pending.range_op = Some(op);
                Ok(())
            }
            _ => Err(CompileError::RangeWithoutField { op }),
        }
    }

    /// Keyword equality, or a keyword range when an operator is pending
    pub fn term(&mut self, text: &str) -> Result<()> {
        let (pending, field) = self.take_pending();
        let query = match pending.range_op {
            Some(op) => Query::from(RangeQuery::new(field).bound(op, text)),
            None => Query::from(TermQuery::new(field, text)),
        };
        self.record(query, pending.negate);
        Ok(())
    }

    /// Free-text match
    pub fn match_text(&mut self, text: &str) -> Result<()> {
        let (pending, field) = self.take_pending();
        Self::reject_range(&pending, &field, "match")?;
        let query = self.admit(Query::from(MatchQuery::new(field, text)))?;
        self.record(query, pending.negate);
        Ok(())
    }

    /// Quoted free-text phrase
    pub fn phrase(&mut self, text: &str) -> Result<()> {
        let (pending, field) = self.take_pending();
        Self::reject_range(&pending, &field, "phrase")?;
        let query = self.admit(Query::from(PhraseQuery::new(field, text)))?;
        self.record(query, pending.negate);
        Ok(())
    }

    pub fn boolean(&mut self, text: &str) -> Result<()> {
        let (pending, field) = self.take_pending();
        Self::reject_range(&pending, &field, "boolean")?;
        let value = literal::parse_boolean(&field, text)?;
        self.record(Query::from(TermQuery::new(field, value)), pending.negate);
        Ok(())
    }

    pub fn exists(&mut self) -> Result<()> {
        let (pending, field) = self.take_pending();
        Self::reject_range(&pending, &field, "exists")?;
        self.record(Query::from(ExistsQuery::new(field)), pending.negate);
        Ok(())
    }

    /// Timestamp or numeric literal
    pub fn date(&mut self, text: &str) -> Result<()> {
        self.scalar(text)
    }

    /// Numeric or timestamp literal
    pub fn number(&mut self, text: &str) -> Result<()> {
        self.scalar(text)
    }

    /// `start~end` literal, compiled to the half-open range `[start, end)`
    pub fn window(&mut self, text: &str) -> Result<()> {
        let (pending, field) = self.take_pending();
        Self::reject_range(&pending, &field, "window")?;
        let (start, end) = literal::parse_window(&field, text)?;
        self.record(
            Query::from(RangeQuery::window(field, start, end)),
            pending.negate,
        );
        Ok(())
    }

    /// Record a group boundary
    pub fn start_group(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.entries.push(StackEntry::GroupBoundary);
        Ok(())
    }

    /// Take back the leaves recorded since the latest group boundary, in the
    /// order they were produced
    ///
    /// At top level there is no boundary and every remaining leaf is returned.
    pub fn pop_group(&mut self) -> Result<Vec<Leaf>> {
        self.ensure_idle()?;
        let mut out = Vec::new();
        while let Some(entry) = self.entries.pop() {
            match entry {
                StackEntry::Leaf(leaf) => out.push(leaf),
                StackEntry::GroupBoundary => break,
            }
        }
        out.reverse();
        Ok(out)
    }

    /// Consume pending negations that have nothing else attached, so they
    /// can apply to the group that follows
    ///
    /// Returns the resulting negate flag; an odd count of `NOT`s yields true.
    pub fn take_pending_negation(&mut self) -> bool {
        match self.current.take() {
            Some(pending) if pending.is_bare() => pending.negate,
            other => {
                self.current = other;
                false
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        self.current.is_some()
    }

    pub fn pending(&self) -> Option<&LeafValue> {
        self.current.as_ref()
    }

    pub fn entries(&self) -> &[StackEntry] {
        &self.entries
    }

    fn scalar(&mut self, text: &str) -> Result<()> {
        let (pending, field) = self.take_pending();
        let value = literal::parse_number_or_date(&field, text)?;
        let query = match pending.range_op {
            Some(op) => Query::from(RangeQuery::new(field).bound(op, value)),
            None => Query::from(TermQuery::new(field, value)),
        };
        self.record(query, pending.negate);
        Ok(())
    }

    /// Close the current comparison, resolving its field
    fn take_pending(&mut self) -> (LeafValue, String) {
        let pending = self.current.take().unwrap_or_default();
        let field = pending
            .field
            .clone()
            .unwrap_or_else(|| self.default_field.clone());
        (pending, field)
    }

    fn reject_range(pending: &LeafValue, field: &str, literal: &'static str) -> Result<()> {
        match pending.range_op {
            Some(op) => Err(CompileError::RangeNotApplicable {
                field: field.to_string(),
                op,
                literal,
            }),
            None => Ok(()),
        }
    }

    /// Apply the filter-context policy to a relevance-scored leaf
    fn admit(&self, query: Query) -> Result<Query> {
        if !self.filter_context || !query.is_scoring() {
            return Ok(query);
        }
        match (self.filter_policy, query) {
            (FilterPolicy::Downgrade, Query::Match(q)) => {
                Ok(Query::from(TermQuery::new(q.field, FieldValue::Text(q.text))))
            }
            (FilterPolicy::Downgrade, Query::Phrase(q)) => {
                Ok(Query::from(TermQuery::new(q.field, FieldValue::Text(q.phrase))))
            }
            (_, Query::Match(q)) => Err(CompileError::FreeTextInFilter {
                field: q.field,
                text: q.text,
                literal: "match",
            }),
            (_, Query::Phrase(q)) => Err(CompileError::FreeTextInFilter {
                field: q.field,
                text: q.phrase,
                literal: "phrase",
            }),
            (_, other) => Ok(other),
        }
    }

    fn ensure_idle(&self) -> Result<()> {
        match &self.current {
            Some(pending) => Err(CompileError::IncompleteComparison {
                field: pending.field.clone(),
            }),
            None => Ok(()),
        }
    }

    fn record(&mut self, query: Query, negate: bool) {
        trace!(
            query_type = query.query_type(),
            field = query.field().unwrap_or_default(),
            negate,
            "leaf produced"
        );
        self.entries.push(StackEntry::Leaf(Leaf { query, negate }));
    }
}
