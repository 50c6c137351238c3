//! Vector index domain - nearest-neighbour queries against a managed index

mod filter;
mod provider;
mod query;

pub use filter::{FilterCondition, FilterValue, MetadataFilter};
pub use provider::VectorIndexProvider;
pub use query::{IndexMatch, IndexQuery};

#[cfg(test)]
pub use provider::mock::MockVectorIndexProvider;
