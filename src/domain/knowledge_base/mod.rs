//! Knowledge Base domain - search requests, results and query enhancement

mod enhancer;
mod request;
mod result;

pub use enhancer::{EnhancementRule, EnhancerRules, MatchMode, QueryEnhancer};
pub use request::{SearchRequest, CATEGORY_FIELD, DEFAULT_SEARCH_LIMIT};
pub use result::SearchResult;
