pub mod fetcher;
pub mod filter;
pub mod generation;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod sources;
pub mod types;
pub mod writer;

pub use types::*;
pub use fetcher::Fetcher;
pub use pipeline::{DigestOptions, DigestPipeline, DigestRun};
