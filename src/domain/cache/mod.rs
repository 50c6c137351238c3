//! Cache domain - search result memoization

mod clock;
mod key;
mod repository;

pub use clock::{Clock, ManualClock, SystemClock};
pub use key::{CategoryScope, SearchCacheKey};
pub use repository::SearchCache;
