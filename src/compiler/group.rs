//! Group composer
//!
//! Keeps one frame per open scope: the implicit top-level scope at the
//! bottom, one more per parenthesized group. Closing a scope folds its leaf
//! batch into the frame's boolean buckets and hands the finished frame to
//! its parent as a single compound clause.
//!
//! Placement rules, by the resolved operator of the scope a clause belongs
//! to:
//!
//! | operator | plain clause | negated clause                    |
//! |----------|--------------|-----------------------------------|
//! | AND      | `must`       | `must_not`                        |
//! | OR       | `should`     | `must_not` wrapping a `should`    |
//!
//! There is no "none of" bucket at the `should` level, so a negated OR
//! clause is wrapped in its own `should` and excluded through `must_not`.
//!
//! Leaves follow their own frame's operator. A closed group is placed in
//! its parent by the group's own operator and negate flag, as soon as it
//! is popped.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::leaf::Leaf;
use crate::error::{CompileError, Result};
use crate::query::ast::Query;
use crate::query::nodes::{BoolQuery, Bucket};
use crate::query::types::{BoolOperator, Operator};

/// Snapshot of a frame used in error reports and compose results
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSummary {
    pub depth: usize,
    pub operator: Operator,
    pub negate: bool,
    /// Clauses already folded into the frame's buckets
    pub clauses: usize,
}

impl fmt::Display for FrameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "depth {}: {}{} with {} clause(s)",
            self.depth,
            if self.negate { "NOT " } else { "" },
            self.operator,
            self.clauses
        )
    }
}

/// Place `query` into `bucket` by the placement table above
fn place(bucket: &mut BoolQuery, operator: Operator, query: Query, negate: bool) {
    match (operator.is_conjunctive(), negate) {
        (true, false) => bucket.push(Bucket::Must, query),
        (true, true) => bucket.push(Bucket::MustNot, query),
        (false, false) => bucket.push(Bucket::Should, query),
        (false, true) => bucket.push(Bucket::MustNot, BoolQuery::new().should(query)),
    }
}

/// One open scope
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupFrame {
    pub bucket: BoolQuery,
    pub operator: Operator,
    pub negate: bool,
}

impl GroupFrame {
    pub fn new(operator: Operator, negate: bool) -> Self {
        Self {
            operator,
            negate,
            ..Default::default()
        }
    }

    pub fn clause_count(&self) -> usize {
        self.bucket.clause_count()
    }

    pub fn summary(&self, depth: usize) -> FrameSummary {
        FrameSummary {
            depth,
            operator: self.operator,
            negate: self.negate,
            clauses: self.clause_count(),
        }
    }

    fn fold(&mut self, leaf: Leaf) {
        place(&mut self.bucket, self.operator, leaf.query, leaf.negate);
    }

    /// Place this frame into its parent as one compound clause
    fn nest_into(self, parent: &mut GroupFrame) {
        place(
            &mut parent.bucket,
            self.operator,
            Query::Bool(self.bucket),
            self.negate,
        );
    }
}

/// Stack of open scopes for one compile
///
/// Depth 0 means uninitialized, depth 1 holds only the base frame, anything
/// deeper is inside parentheses.
#[derive(Debug)]
pub struct GroupComposer {
    stack: Vec<GroupFrame>,
    default_operator: BoolOperator,
}

impl GroupComposer {
    pub fn new(default_operator: BoolOperator) -> Self {
        Self {
            stack: Vec::new(),
            default_operator,
        }
    }

    /// Create the base frame if the stack is uninitialized
    pub fn init(&mut self) {
        if self.stack.is_empty() {
            self.stack
                .push(GroupFrame::new(Operator::seeded(self.default_operator), false));
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn current(&self) -> Option<&GroupFrame> {
        self.stack.last()
    }

    /// Open a nested scope
    pub fn push(&mut self, negate: bool) {
        self.init();
        self.stack
            .push(GroupFrame::new(Operator::seeded(self.default_operator), negate));
        debug!(depth = self.depth(), negate, "group opened");
    }

    /// Record an explicit operator for the current scope
    pub fn set_operator(&mut self, op: BoolOperator) -> Result<()> {
        self.init();
        let depth = self.depth();
        let frame = self.stack.last_mut().ok_or(CompileError::StackUnderflow)?;
        let requested = Operator::explicit(op);
        if frame.operator.is_explicit() && frame.operator != requested {
            return Err(CompileError::OperatorConflict {
                depth,
                current: frame.operator,
                requested: op,
            });
        }
        if frame.operator != requested {
            debug!(depth, from = %frame.operator, to = %requested, "operator set");
            frame.operator = requested;
        }
        Ok(())
    }

    /// Fold a leaf batch into the current frame, then pop it
    ///
    /// Child groups already placed in the frame count as clauses. A frame
    /// holding exactly one clause resolves to AND unless an explicit operator
    /// was written; a frame with no clauses at all is an error.
    pub fn compose(&mut self, leaves: Vec<Leaf>) -> Result<FrameSummary> {
        self.init();
        let depth = self.depth();
        let frame = self.stack.last_mut().ok_or(CompileError::StackUnderflow)?;

        let total = leaves.len() + frame.clause_count();
        if total == 0 {
            return Err(CompileError::EmptyClause { depth });
        }
        if total == 1 && !frame.operator.is_explicit() {
            frame.operator = Operator::And;
        }

        for leaf in leaves {
            frame.fold(leaf);
        }

        self.pop()
    }

    /// Remove the top frame and nest it into its parent
    ///
    /// The popped frame is placed by its own operator and negate flag. The
    /// base frame has no parent; it is put back so later top-level
    /// clauses keep composing into it.
    pub fn pop(&mut self) -> Result<FrameSummary> {
        let depth = self.depth();
        let frame = self.stack.pop().ok_or(CompileError::StackUnderflow)?;
        let summary = frame.summary(depth);

        match self.stack.last_mut() {
            Some(parent) => {
                frame.nest_into(parent);
                debug!(depth, operator = %summary.operator, negate = summary.negate, "group closed");
            }
            None => self.stack.push(frame),
        }
        Ok(summary)
    }

    /// Close a parenthesized scope
    pub fn close(&mut self, leaves: Vec<Leaf>) -> Result<FrameSummary> {
        if self.depth() <= 1 {
            return Err(CompileError::UnbalancedClose);
        }
        self.compose(leaves)
    }

    /// Compose the trailing top-level batch and hand back the base frame
    ///
    /// Every parenthesized scope must already be closed; otherwise the open
    /// frames are reported deepest first.
    pub fn finalize(&mut self, leaves: Vec<Leaf>) -> Result<GroupFrame> {
        self.init();
        if self.depth() > 1 {
            let frames = self
                .stack
                .iter()
                .enumerate()
                .skip(1)
                .rev()
                .map(|(i, frame)| frame.summary(i + 1))
                .collect();
            return Err(CompileError::UnterminatedGroup { frames });
        }

        let summary = self.compose(leaves)?;
        debug!(operator = %summary.operator, clauses = summary.clauses, "query composed");
        self.stack.pop().ok_or(CompileError::StackUnderflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::nodes::TermQuery;

    fn term(field: &str, value: &str) -> Query {
        Query::from(TermQuery::new(field, value))
    }

    fn leaf(field: &str, value: &str, negate: bool) -> Leaf {
        Leaf::new(term(field, value), negate)
    }

    fn composer() -> GroupComposer {
        let mut composer = GroupComposer::new(BoolOperator::And);
        composer.init();
        composer
    }

    fn or_group(negate: bool) -> GroupComposer {
        let mut composer = composer();
        composer.push(negate);
        composer.set_operator(BoolOperator::Or).unwrap();
        composer
            .close(vec![leaf("x", "1", false), leaf("y", "2", false)])
            .unwrap();
        composer
    }

    fn xy() -> BoolQuery {
        BoolQuery::new().should(term("x", "1")).should(term("y", "2"))
    }

    #[test]
    fn test_init_creates_base_frame() {
        let mut composer = GroupComposer::new(BoolOperator::Or);
        assert_eq!(composer.depth(), 0);
        composer.init();
        composer.init();
        assert_eq!(composer.depth(), 1);
        assert_eq!(composer.current().unwrap().operator, Operator::DefaultOr);
    }

    #[test]
    fn test_pop_on_uninitialized_stack_fails() {
        let mut composer = GroupComposer::new(BoolOperator::And);
        assert_eq!(composer.pop().unwrap_err(), CompileError::StackUnderflow);
    }

    #[test]
    fn test_close_without_push_fails() {
        let mut composer = composer();
        assert_eq!(
            composer.close(vec![leaf("a", "1", false)]).unwrap_err(),
            CompileError::UnbalancedClose
        );
    }

    #[test]
    fn test_single_leaf_resolves_to_and() {
        for default in [BoolOperator::And, BoolOperator::Or] {
            let mut composer = GroupComposer::new(default);
            let frame = composer.finalize(vec![leaf("a", "1", false)]).unwrap();
            assert_eq!(frame.operator, Operator::And);
            assert_eq!(frame.bucket.must, vec![term("a", "1")]);
        }
    }

    #[test]
    fn test_single_negated_leaf_in_explicit_or() {
        let mut composer = composer();
        composer.set_operator(BoolOperator::Or).unwrap();
        let frame = composer.finalize(vec![leaf("a", "1", true)]).unwrap();
        assert_eq!(frame.operator, Operator::Or);
        // one should level inside must_not, no extra wrapper
        assert_eq!(
            frame.bucket,
            BoolQuery::new().must_not(BoolQuery::new().should(term("a", "1")))
        );
    }

    #[test]
    fn test_empty_clause_is_fatal() {
        let mut composer = composer();
        assert_eq!(
            composer.finalize(Vec::new()).unwrap_err(),
            CompileError::EmptyClause { depth: 1 }
        );

        let mut composer = self::composer();
        composer.push(false);
        assert_eq!(
            composer.close(Vec::new()).unwrap_err(),
            CompileError::EmptyClause { depth: 2 }
        );
    }

    #[test]
    fn test_and_folding() {
        let mut composer = composer();
        let frame = composer
            .finalize(vec![leaf("a", "1", false), leaf("b", "2", true)])
            .unwrap();
        assert_eq!(frame.operator, Operator::DefaultAnd);
        assert_eq!(frame.bucket.must, vec![term("a", "1")]);
        assert_eq!(frame.bucket.must_not, vec![term("b", "2")]);
        assert!(frame.bucket.should.is_empty());
    }

    #[test]
    fn test_or_folding_excludes_negation_through_should() {
        let mut composer = composer();
        composer.set_operator(BoolOperator::Or).unwrap();
        let frame = composer
            .finalize(vec![leaf("a", "1", false), leaf("b", "2", true)])
            .unwrap();
        assert!(frame.bucket.must.is_empty());
        assert_eq!(frame.bucket.should, vec![term("a", "1")]);
        assert_eq!(
            frame.bucket.must_not,
            vec![Query::from(BoolQuery::new().should(term("b", "2")))]
        );
    }

    #[test]
    fn test_default_or_folds_like_or() {
        let mut composer = GroupComposer::new(BoolOperator::Or);
        let frame = composer
            .finalize(vec![leaf("a", "1", false), leaf("b", "2", true)])
            .unwrap();
        assert_eq!(frame.operator, Operator::DefaultOr);
        assert_eq!(frame.bucket.should, vec![term("a", "1")]);
        assert_eq!(frame.bucket.must_not.len(), 1);
    }

    #[test]
    fn test_operator_conflict() {
        let mut composer = composer();
        composer.set_operator(BoolOperator::And).unwrap();
        composer.set_operator(BoolOperator::And).unwrap();
        assert_eq!(
            composer.set_operator(BoolOperator::Or).unwrap_err(),
            CompileError::OperatorConflict {
                depth: 1,
                current: Operator::And,
                requested: BoolOperator::Or,
            }
        );
    }

    #[test]
    fn test_operators_are_per_frame() {
        let mut composer = composer();
        composer.set_operator(BoolOperator::And).unwrap();
        composer.push(false);
        composer.set_operator(BoolOperator::Or).unwrap();
        assert_eq!(composer.current().unwrap().operator, Operator::Or);
    }

    #[test]
    fn test_or_group_lands_in_parent_should() {
        let mut composer = or_group(false);
        assert_eq!(composer.depth(), 1);
        assert_eq!(composer.current().unwrap().clause_count(), 1);

        let frame = composer.finalize(vec![leaf("a", "1", false)]).unwrap();
        assert_eq!(frame.bucket, BoolQuery::new().must(term("a", "1")).should(xy()));
    }

    #[test]
    fn test_and_group_lands_in_parent_must() {
        let mut composer = composer();
        composer.push(false);
        let summary = composer
            .close(vec![leaf("b", "2", false), leaf("c", "3", false)])
            .unwrap();
        assert_eq!(summary.depth, 2);
        assert_eq!(summary.operator, Operator::DefaultAnd);

        let frame = composer.finalize(vec![leaf("a", "1", false)]).unwrap();
        let inner = BoolQuery::new().must(term("b", "2")).must(term("c", "3"));
        assert_eq!(frame.bucket, BoolQuery::new().must(term("a", "1")).must(inner));
    }

    #[test]
    fn test_negated_or_group_is_wrapped_in_should() {
        let mut composer = or_group(true);
        let frame = composer.finalize(Vec::new()).unwrap();
        assert_eq!(
            frame.bucket,
            BoolQuery::new().must_not(BoolQuery::new().should(xy()))
        );
    }

    #[test]
    fn test_negated_and_group_goes_to_must_not() {
        let mut composer = composer();
        composer.push(true);
        composer
            .close(vec![leaf("x", "1", false), leaf("y", "2", false)])
            .unwrap();
        let frame = composer.finalize(Vec::new()).unwrap();
        let inner = BoolQuery::new().must(term("x", "1")).must(term("y", "2"));
        assert_eq!(frame.bucket, BoolQuery::new().must_not(inner));
    }

    #[test]
    fn test_group_placement_ignores_parent_operator() {
        // the same negated OR group under an OR parent
        let mut composer = or_group(true);
        composer.set_operator(BoolOperator::Or).unwrap();
        let frame = composer.finalize(vec![leaf("z", "3", false)]).unwrap();
        assert_eq!(
            frame.bucket,
            BoolQuery::new()
                .should(term("z", "3"))
                .must_not(BoolQuery::new().should(xy()))
        );
    }

    #[test]
    fn test_base_frame_is_restacked() {
        let mut composer = composer();
        let first = composer.compose(vec![leaf("a", "1", false)]).unwrap();
        assert_eq!(first.depth, 1);
        assert_eq!(composer.depth(), 1);

        let second = composer.compose(vec![leaf("b", "2", false)]).unwrap();
        assert_eq!(second.depth, 1);
        assert_eq!(composer.depth(), 1);

        let frame = composer.finalize(vec![leaf("c", "3", false)]).unwrap();
        assert_eq!(
            frame.bucket.must,
            vec![term("a", "1"), term("b", "2"), term("c", "3")]
        );
        assert_eq!(composer.depth(), 0);
    }

    #[test]
    fn test_unterminated_groups_reported_deepest_first() {
        let mut composer = composer();
        composer.push(false);
        composer.push(true);
        composer.set_operator(BoolOperator::Or).unwrap();

        let err = composer.finalize(vec![leaf("a", "1", false)]).unwrap_err();
        match err {
            CompileError::UnterminatedGroup { frames } => {
                assert_eq!(frames.len(), 2);
                assert_eq!(frames[0].depth, 3);
                assert_eq!(frames[0].operator, Operator::Or);
                assert!(frames[0].negate);
                assert_eq!(frames[1].depth, 2);
                assert!(!frames[1].negate);
            }
            other => panic!("expected unterminated group, got {:?}", other),
        }
    }

    #[test]
    fn test_group_with_only_child_group_is_not_empty() {
        let mut composer = composer();
        composer.push(false);
        composer.push(false);
        composer.close(vec![leaf("a", "1", false)]).unwrap();
        let summary = composer.close(Vec::new()).unwrap();
        assert_eq!(summary.operator, Operator::And);

        let frame = composer.finalize(Vec::new()).unwrap();
        assert_eq!(frame.bucket.depth(), 3);
    }
}
