pub mod client;
pub mod merge;

pub use client::MeilisearchClient;
pub use merge::{SearchService, SearchVariant};
