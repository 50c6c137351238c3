//! Vector index provider implementations

mod pinecone;

pub use pinecone::{
    PineconeConfig, PineconeVectorIndex, DEFAULT_PINECONE_CONTROL_PLANE, DEFAULT_PINECONE_INDEX,
    PINECONE_API_VERSION,
};
