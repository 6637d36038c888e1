//! Read surface over the primary store, used by the bootstrap/resync job.
//!
//! The primary store (documents for users, posts, hives) is the single
//! source of truth; the graph can be dropped and rebuilt from these reads
//! alone. Implementations: Postgres in the API service, in-memory in the
//! graph crate's test utilities.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::HivelyError;
use crate::types::{CommunityRecord, PostRecord, UserRecord};

pub type StoreResult<T> = Result<T, HivelyError>;

/// A hive (community) plus its recorded relationship lists.
#[derive(Debug, Clone)]
pub struct CommunityState {
    pub community: CommunityRecord,
    pub member_ids: Vec<Uuid>,
    pub moderator_ids: Vec<Uuid>,
    pub post_ids: Vec<Uuid>,
}

#[async_trait]
pub trait PrimaryStore: Send + Sync {
    /// Every user record.
    async fn users(&self) -> StoreResult<Vec<UserRecord>>;

    /// Every post record.
    async fn posts(&self) -> StoreResult<Vec<PostRecord>>;

    /// Every hive with its member/moderator/post lists.
    async fn communities(&self) -> StoreResult<Vec<CommunityState>>;

    /// Every recorded follow as `(follower_id, followee_id)`.
    async fn follows(&self) -> StoreResult<Vec<(Uuid, Uuid)>>;

    /// Every recorded like as `(user_id, post_id)`.
    async fn likes(&self) -> StoreResult<Vec<(Uuid, Uuid)>>;
}
