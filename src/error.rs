use thiserror::Error;

use crate::compiler::FrameSummary;
use crate::query::types::{BoolOperator, Operator, RangeOp};

/// Broad classes of compile failures
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Group nesting or clause shape is broken
    Structural,
    /// Operators contradict each other within one clause
    Semantic,
    /// A literal could not be interpreted
    Literal,
    /// A clause is not allowed in the active evaluation context
    Context,
    /// Caller-supplied configuration or event script is unreadable
    Configuration,
}

/// Main error type for query compilation
///
/// Every variant is fatal: the compile that produced it is abandoned and no
/// partial tree is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Unterminated group: {}", summarize(.frames))]
    UnterminatedGroup { frames: Vec<FrameSummary> },

    #[error("Empty clause at depth {depth}")]
    EmptyClause { depth: usize },

    #[error("Frame stack underflow: pop on an uninitialized stack")]
    StackUnderflow,

    #[error("Unbalanced group close: no open group to close")]
    UnbalancedClose,

    #[error("Incomplete comparison for field {}: no literal followed", display_field(.field))]
    IncompleteComparison { field: Option<String> },

    #[error("Operator conflict at depth {depth}: clause is already {current}, cannot switch to {requested}")]
    OperatorConflict {
        depth: usize,
        current: Operator,
        requested: BoolOperator,
    },

    #[error("Unknown operator: {token:?}")]
    UnknownOperator { token: String },

    #[error("Malformed boolean literal {value:?} for field {field:?}")]
    MalformedBoolean { field: String, value: String },

    #[error("Malformed number or date literal {value:?} for field {field:?}")]
    MalformedNumber { field: String, value: String },

    #[error("Malformed range window {value:?} for field {field:?}: {reason}")]
    MalformedWindow {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Range operator {op} has no field to compare")]
    RangeWithoutField { op: RangeOp },

    #[error("Range operator {op} cannot apply to {literal} literal for field {field:?}")]
    RangeNotApplicable {
        field: String,
        op: RangeOp,
        literal: &'static str,
    },

    #[error("Free-text {literal} clause {text:?} on field {field:?} is not allowed in filter context")]
    FreeTextInFilter {
        field: String,
        text: String,
        literal: &'static str,
    },

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Invalid event script: {0}")]
    EventScript(String),
}

/// Result type alias for compile operations
pub type Result<T> = std::result::Result<T, CompileError>;

impl CompileError {
    /// Classify this error into its broad failure class
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompileError::UnterminatedGroup { .. }
            | CompileError::EmptyClause { .. }
            | CompileError::StackUnderflow
            | CompileError::UnbalancedClose
            | CompileError::IncompleteComparison { .. } => ErrorKind::Structural,
            CompileError::OperatorConflict { .. } => ErrorKind::Semantic,
            CompileError::UnknownOperator { .. }
            | CompileError::MalformedBoolean { .. }
            | CompileError::MalformedNumber { .. }
            | CompileError::MalformedWindow { .. }
            | CompileError::RangeWithoutField { .. }
            | CompileError::RangeNotApplicable { .. } => ErrorKind::Literal,
            CompileError::FreeTextInFilter { .. } => ErrorKind::Context,
            CompileError::Configuration(_) | CompileError::EventScript(_) => {
                ErrorKind::Configuration
            }
        }
    }

    /// Check if this error was caused by the query text rather than by the
    /// caller's setup
    pub fn is_user_error(&self) -> bool {
        self.kind() != ErrorKind::Configuration
    }

    /// Field named by this error, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            CompileError::IncompleteComparison { field } => field.as_deref(),
            CompileError::MalformedBoolean { field, .. }
            | CompileError::MalformedNumber { field, .. }
            | CompileError::MalformedWindow { field, .. }
            | CompileError::RangeNotApplicable { field, .. }
            | CompileError::FreeTextInFilter { field, .. } => Some(field),
            _ => None,
        }
    }
}

fn summarize(frames: &[FrameSummary]) -> String {
    let parts: Vec<String> = frames.iter().map(ToString::to_string).collect();
    format!("{} open group(s) [{}]", frames.len(), parts.join("; "))
}

fn display_field(field: &Option<String>) -> String {
    match field {
        Some(name) => format!("{:?}", name),
        None => "<default>".to_string(),
    }
}
