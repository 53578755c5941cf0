//! Concrete query node implementations
//!
//! Each leaf kind the compiler can produce has its own node type; `BoolQuery`
//! nests them into must/must_not/should buckets.

mod bool_query;
mod exists_query;
mod match_query;
mod phrase_query;
mod range_query;
mod term_query;

pub use bool_query::{BoolQuery, Bucket};
pub use exists_query::ExistsQuery;
pub use match_query::MatchQuery;
pub use phrase_query::PhraseQuery;
pub use range_query::RangeQuery;
pub use term_query::TermQuery;
