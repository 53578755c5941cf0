//! Query tree model
//!
//! This module holds the boolean query tree the compiler emits:
//! - Boolean queries (must, must_not, should)
//! - Term queries (exact keyword, number, date or boolean equality)
//! - Match and phrase queries (free text, relevance-scored)
//! - Range queries (numeric/date/keyword bounds)
//! - Exists queries (field presence)
//!
//! # Example
//!
//! ```json
//! {
//!   "bool": {
//!     "must": [
//!       { "range": { "field": "age", "gte": 18 } },
//!       { "range": { "field": "age", "lt": 65 } }
//!     ]
//!   }
//! }
//! ```

pub mod ast;
pub mod nodes;
pub mod types;

pub use ast::{Query, QueryNode};
pub use nodes::{
    BoolQuery, Bucket, ExistsQuery, MatchQuery, PhraseQuery, RangeQuery, TermQuery,
};
pub use types::*;
