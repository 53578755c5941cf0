//! Range query - matches documents with field values in a range

use crate::query::ast::QueryNode;
use crate::query::types::{FieldValue, RangeBounds, RangeOp};
use serde::{Deserialize, Serialize};

/// Query that matches documents with field values within a specified range
///
/// Works with numeric, date and keyword values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeQuery {
    /// Field to search in
    pub field: String,
    /// Range bounds (gte, gt, lte, lt)
    #[serde(flatten)]
    pub bounds: RangeBounds,
}

impl RangeQuery {
    /// Create a new, unbounded range query
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            bounds: RangeBounds::default(),
        }
    }

    /// Set the bound selected by a comparison operator
    pub fn bound(mut self, op: RangeOp, value: impl Into<FieldValue>) -> Self {
        self.bounds.set(op, value.into());
        self
    }

    /// Set the greater-than-or-equal bound
    pub fn gte(self, value: impl Into<FieldValue>) -> Self {
        self.bound(RangeOp::Gte, value)
    }

    /// Set the greater-than bound
    pub fn gt(self, value: impl Into<FieldValue>) -> Self {
        self.bound(RangeOp::Gt, value)
    }

    /// Set the less-than-or-equal bound
    pub fn lte(self, value: impl Into<FieldValue>) -> Self {
        self.bound(RangeOp::Lte, value)
    }

    /// Set the less-than bound
    pub fn lt(self, value: impl Into<FieldValue>) -> Self {
        self.bound(RangeOp::Lt, value)
    }

    /// Half-open interval `[start, end)`
    pub fn window(field: impl Into<String>, start: FieldValue, end: FieldValue) -> Self {
        Self::new(field).gte(start).lt(end)
    }
}

impl QueryNode for RangeQuery {
    fn query_type(&self) -> &'static str {
        "range"
    }

    fn is_scoring(&self) -> bool {
        false
    }

    fn field(&self) -> Option<&str> {
        Some(&self.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_query_builders() {
        let query = RangeQuery::new("age").gte(18_i64).lt(65_i64);
        assert_eq!(query.bounds.gte, Some(FieldValue::Long(18)));
        assert_eq!(query.bounds.lt, Some(FieldValue::Long(65)));
        assert!(query.bounds.gt.is_none());
        assert!(query.bounds.lte.is_none());
        assert!(!query.is_scoring());
    }

    #[test]
    fn test_range_query_bound_by_operator() {
        let query = RangeQuery::new("price").bound(RangeOp::Lte, 9.5);
        assert_eq!(query.bounds.get(RangeOp::Lte), Some(&FieldValue::Double(9.5)));
    }

    #[test]
    fn test_window_is_half_open() {
        let query = RangeQuery::window("year", FieldValue::Long(2020), FieldValue::Long(2024));
        assert_eq!(query.bounds.gte, Some(FieldValue::Long(2020)));
        assert_eq!(query.bounds.lt, Some(FieldValue::Long(2024)));
        assert!(query.bounds.lte.is_none());
    }

    #[test]
    fn test_range_query_serializes_flat() {
        let json = serde_json::to_value(RangeQuery::new("age").gte(18_i64)).unwrap();
        assert_eq!(json, serde_json::json!({ "field": "age", "gte": 18 }));
    }
}
