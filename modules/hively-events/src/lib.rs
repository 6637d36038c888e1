//! Generic, domain-agnostic append-only outbox.
//!
//! Stores opaque JSONB facts in write order. The primary application
//! appends in the same transaction as its document write; the graph
//! projector tails the table through a named cursor. Zero knowledge of
//! users, posts, Neo4j, or any domain concept.

pub mod store;
pub mod types;

pub use store::OutboxStore;
pub use types::{AppendEvent, StoredEvent};
