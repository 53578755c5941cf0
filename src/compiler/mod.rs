//! Query compiler
//!
//! Routes parser events to the two stacks that build the tree: the leaf
//! builder turns comparisons into typed leaves, the group composer folds
//! those leaves into nested boolean buckets.
//!
//! # Example
//!
//! ```
//! use querydsl::compiler::{ParseEvent, QueryCompiler};
//! use querydsl::config::CompilerConfig;
//!
//! let events = vec![
//!     ParseEvent::Field("a".to_string()),
//!     ParseEvent::Number("1".to_string()),
//!     ParseEvent::Operator("OR".parse().unwrap()),
//!     ParseEvent::Field("b".to_string()),
//!     ParseEvent::Number("2".to_string()),
//! ];
//! let compiled = QueryCompiler::compile(CompilerConfig::default(), events).unwrap();
//! assert_eq!(compiled.root.should.len(), 2);
//! ```

mod events;
mod group;
mod leaf;
mod literal;

pub use events::ParseEvent;
pub use group::{FrameSummary, GroupComposer, GroupFrame};
pub use leaf::{Leaf, LeafBuilder, LeafValue, StackEntry};
pub use literal::{parse_boolean, parse_number_or_date, parse_window};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CompilerConfig;
use crate::error::{CompileError, Result};
use crate::query::ast::Query;
use crate::query::nodes::BoolQuery;
use crate::query::types::Operator;

/// Root of a finished compile
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompiledQuery {
    pub root: BoolQuery,
    /// Operator the top-level clause resolved to
    pub operator: Operator,
}

impl CompiledQuery {
    pub fn into_query(self) -> Query {
        Query::Bool(self.root)
    }
}

/// One compile of one query
///
/// Not reusable: `finish` consumes the compiler. The first error poisons it
/// and is returned again by every later call.
#[derive(Debug)]
pub struct QueryCompiler {
    config: CompilerConfig,
    values: LeafBuilder,
    groups: GroupComposer,
    failure: Option<CompileError>,
}

impl QueryCompiler {
    pub fn new(config: CompilerConfig) -> Result<Self> {
        config.validate()?;
        let mut groups = GroupComposer::new(config.default_operator);
        groups.init();
        Ok(Self {
            values: LeafBuilder::new(&config),
            groups,
            config,
            failure: None,
        })
    }

    /// Compile a whole event stream
    pub fn compile(
        config: CompilerConfig,
        events: impl IntoIterator<Item = ParseEvent>,
    ) -> Result<CompiledQuery> {
        let mut compiler = Self::new(config)?;
        for event in events {
            compiler.apply(event)?;
        }
        compiler.finish()
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Current group nesting, 1 at top level
    pub fn depth(&self) -> usize {
        self.groups.depth()
    }

    pub fn is_poisoned(&self) -> bool {
        self.failure.is_some()
    }

    pub fn apply(&mut self, event: ParseEvent) -> Result<()> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let name = event.name();
        self.dispatch(event).map_err(|err| {
            debug!(event = name, error = %err, "compile aborted");
            self.failure = Some(err.clone());
            err
        })
    }

    /// Compose the trailing top-level clause and return the tree
    pub fn finish(mut self) -> Result<CompiledQuery> {
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        if let Some(pending) = self.values.pending() {
            return Err(CompileError::IncompleteComparison {
                field: pending.field.clone(),
            });
        }
        let leaves = self.values.pop_group()?;
        let frame = self.groups.finalize(leaves)?;
        Ok(CompiledQuery {
            root: frame.bucket,
            operator: frame.operator,
        })
    }

    fn dispatch(&mut self, event: ParseEvent) -> Result<()> {
        match event {
            ParseEvent::Negate => self.values.set_negation(),
            ParseEvent::Field(name) => {
                self.values.set_field(name);
                Ok(())
            }
            ParseEvent::RangeOp(op) => self.values.set_range_op(op),
            ParseEvent::Operator(op) => self.groups.set_operator(op),
            ParseEvent::Term(text) => self.values.term(&text),
            ParseEvent::Match(text) => self.values.match_text(&text),
            ParseEvent::Phrase(text) => self.values.phrase(&text),
            ParseEvent::Boolean(text) => self.values.boolean(&text),
            ParseEvent::Date(text) => self.values.date(&text),
            ParseEvent::Number(text) => self.values.number(&text),
            ParseEvent::Window(text) => self.values.window(&text),
            ParseEvent::Exists => self.values.exists(),
            ParseEvent::OpenGroup { negate } => {
                let negate = self.values.take_pending_negation() ^ negate;
                self.values.start_group()?;
                self.groups.push(negate);
                Ok(())
            }
            ParseEvent::CloseGroup => {
                if self.groups.depth() <= 1 {
                    return Err(CompileError::UnbalancedClose);
                }
                let leaves = self.values.pop_group()?;
                self.groups.close(leaves).map(|_| ())
            }
        }
    }
}
