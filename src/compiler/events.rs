//! Event vocabulary spoken by a parser driver
//!
//! A driver walks the query text and fires these events in encounter order.
//! They serialize as `{"event": "field", "value": "title"}` so recorded
//! event scripts can be replayed without a parser.

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, Result};
use crate::query::types::{BoolOperator, RangeOp};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum ParseEvent {
    /// `NOT` before a comparison or a group
    Negate,
    /// Field name before `:`
    Field(String),
    /// `<`, `<=`, `>`, `>=` after a field
    RangeOp(RangeOp),
    /// Explicit `AND`/`OR` between clauses
    Operator(BoolOperator),
    Term(String),
    Match(String),
    Phrase(String),
    Boolean(String),
    Date(String),
    Number(String),
    /// `start~end` literal
    Window(String),
    /// `_exists_:field`, with the field carried by a preceding `Field`
    Exists,
    OpenGroup {
        #[serde(default)]
        negate: bool,
    },
    CloseGroup,
}

impl ParseEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ParseEvent::Negate => "negate",
            ParseEvent::Field(_) => "field",
            ParseEvent::RangeOp(_) => "range_op",
            ParseEvent::Operator(_) => "operator",
            ParseEvent::Term(_) => "term",
            ParseEvent::Match(_) => "match",
            ParseEvent::Phrase(_) => "phrase",
            ParseEvent::Boolean(_) => "boolean",
            ParseEvent::Date(_) => "date",
            ParseEvent::Number(_) => "number",
            ParseEvent::Window(_) => "window",
            ParseEvent::Exists => "exists",
            ParseEvent::OpenGroup { .. } => "open_group",
            ParseEvent::CloseGroup => "close_group",
        }
    }

    /// Whether this event completes a leaf
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            ParseEvent::Term(_)
                | ParseEvent::Match(_)
                | ParseEvent::Phrase(_)
                | ParseEvent::Boolean(_)
                | ParseEvent::Date(_)
                | ParseEvent::Number(_)
                | ParseEvent::Window(_)
                | ParseEvent::Exists
        )
    }

    /// Load a recorded event script (a JSON array of events)
    pub fn from_json(json: &str) -> Result<Vec<ParseEvent>> {
        serde_json::from_str(json).map_err(|e| CompileError::EventScript(e.to_string()))
    }
}
