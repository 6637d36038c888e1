pub mod bootstrap;
pub mod client;
pub mod migrate;
pub mod projector;
pub mod reader;
pub mod writer;

#[cfg(feature = "test-utils")]
pub mod testutil;

pub use bootstrap::{resync, ResyncStats};
pub use client::GraphClient;
pub use projector::GraphProjector;
pub use reader::RecommendationReader;
pub use writer::GraphWriter;

pub use neo4rs::query;
