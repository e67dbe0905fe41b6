pub mod chunker;
pub mod embeddings;
pub mod extractor;
pub mod job_store;
pub mod pipeline;
pub mod reasoning;
pub mod scorer;
pub mod storage;
