//! Core types for the query system

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CompileError;

/// Boolean connective between the clauses of a group
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoolOperator {
    /// All clauses must match (AND)
    #[default]
    And,
    /// At least one clause must match (OR)
    Or,
}

impl FromStr for BoolOperator {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "and" | "&&" | "&" => Ok(BoolOperator::And),
            "or" | "||" | "|" => Ok(BoolOperator::Or),
            _ => Err(CompileError::UnknownOperator {
                token: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for BoolOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolOperator::And => write!(f, "AND"),
            BoolOperator::Or => write!(f, "OR"),
        }
    }
}

/// Resolved operator state of one group frame
///
/// `DefaultAnd` and `DefaultOr` are placeholders seeded from configuration
/// and may be replaced by an explicit operator. `And` and `Or` are explicit
/// and never flip to the opposite connective.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    #[default]
    Unset,
    DefaultAnd,
    DefaultOr,
    And,
    Or,
}

impl Operator {
    /// Placeholder operator for a freshly opened frame
    pub fn seeded(default: BoolOperator) -> Self {
        match default {
            BoolOperator::And => Operator::DefaultAnd,
            BoolOperator::Or => Operator::DefaultOr,
        }
    }

    /// Explicit operator as written in the query
    pub fn explicit(op: BoolOperator) -> Self {
        match op {
            BoolOperator::And => Operator::And,
            BoolOperator::Or => Operator::Or,
        }
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, Operator::And | Operator::Or)
    }

    /// Whether clauses fold into `must`/`must_not` (an unset frame folds as AND)
    pub fn is_conjunctive(&self) -> bool {
        matches!(self, Operator::Unset | Operator::DefaultAnd | Operator::And)
    }

    pub fn connective(&self) -> BoolOperator {
        if self.is_conjunctive() {
            BoolOperator::And
        } else {
            BoolOperator::Or
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Unset => write!(f, "unset"),
            Operator::DefaultAnd => write!(f, "AND (default)"),
            Operator::DefaultOr => write!(f, "OR (default)"),
            Operator::And => write!(f, "AND"),
            Operator::Or => write!(f, "OR"),
        }
    }
}

/// Comparison operator attached to a field before its literal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeOp {
    Lt,
    Lte,
    Gt,
    Gte,
}

impl RangeOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            RangeOp::Lt => "<",
            RangeOp::Lte => "<=",
            RangeOp::Gt => ">",
            RangeOp::Gte => ">=",
        }
    }
}

impl FromStr for RangeOp {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<" | "lt" => Ok(RangeOp::Lt),
            "<=" | "lte" => Ok(RangeOp::Lte),
            ">" | "gt" => Ok(RangeOp::Gt),
            ">=" | "gte" => Ok(RangeOp::Gte),
            _ => Err(CompileError::UnknownOperator {
                token: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for RangeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Typed literal carried by term and range leaves
///
/// Serialized untagged, so the wire form is the bare JSON value. Reading a
/// tree back is lossy for text: a keyword that is itself an RFC3339
/// timestamp deserializes as `Date`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    /// 64-bit integer
    Long(i64),
    /// 64-bit floating point
    Double(f64),
    /// RFC3339 timestamp (calendar dates are normalized to midnight UTC)
    Date(DateTime<FixedOffset>),
    /// Keyword text
    Text(String),
}

impl FieldValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Bool(_) => "boolean",
            FieldValue::Long(_) | FieldValue::Double(_) => "number",
            FieldValue::Date(_) => "date",
            FieldValue::Text(_) => "text",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldValue::Long(_) | FieldValue::Double(_))
    }

    /// Convert to f64 if numeric
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Long(v) => Some(*v as f64),
            FieldValue::Double(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(v) => write!(f, "{}", v),
            FieldValue::Long(v) => write!(f, "{}", v),
            FieldValue::Double(v) => write!(f, "{}", v),
            FieldValue::Date(v) => write!(f, "{}", v.to_rfc3339()),
            FieldValue::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Long(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Double(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<DateTime<FixedOffset>> for FieldValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        FieldValue::Date(value)
    }
}

/// Range bounds for range queries
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeBounds {
    /// Greater than or equal to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<FieldValue>,
    /// Greater than
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<FieldValue>,
    /// Less than or equal to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<FieldValue>,
    /// Less than
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<FieldValue>,
}

impl RangeBounds {
    /// Set the bound selected by a comparison operator
    pub fn set(&mut self, op: RangeOp, value: FieldValue) {
        let slot = match op {
            RangeOp::Lt => &mut self.lt,
            RangeOp::Lte => &mut self.lte,
            RangeOp::Gt => &mut self.gt,
            RangeOp::Gte => &mut self.gte,
        };
        *slot = Some(value);
    }

    pub fn get(&self, op: RangeOp) -> Option<&FieldValue> {
        match op {
            RangeOp::Lt => self.lt.as_ref(),
            RangeOp::Lte => self.lte.as_ref(),
            RangeOp::Gt => self.gt.as_ref(),
            RangeOp::Gte => self.gte.as_ref(),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.gte.is_none() && self.gt.is_none() && self.lte.is_none() && self.lt.is_none()
    }
}
