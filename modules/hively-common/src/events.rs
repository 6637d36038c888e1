//! Sync events — typed deltas emitted by the primary store's write path.
//!
//! The write path never lets the graph layer introspect its update
//! operators; it emits one explicit event per changed fact (one edge per
//! event), and list changes are decomposed with [`diff_ids`] before
//! emission. Events serialize to `serde_json::Value` for the outbox.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{CommunityRecord, PostRecord, UserRecord};

/// Direction of an edge change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeDelta {
    Added,
    Removed,
}

/// A fact about a primary-store mutation the graph must mirror.
///
/// The `type` tag becomes the `event_type` column in the outbox table.
/// The rest serializes to the `payload` JSONB column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyncEvent {
    UserSaved {
        user: UserRecord,
    },

    PostSaved {
        post: PostRecord,
    },

    CommunitySaved {
        community: CommunityRecord,
    },

    FollowChanged {
        delta: EdgeDelta,
        follower_id: Uuid,
        followee_id: Uuid,
    },

    LikeChanged {
        delta: EdgeDelta,
        user_id: Uuid,
        post_id: Uuid,
    },

    MembershipChanged {
        delta: EdgeDelta,
        user_id: Uuid,
        community_id: Uuid,
    },

    ModeratorChanged {
        delta: EdgeDelta,
        user_id: Uuid,
        community_id: Uuid,
    },

    CommunityPostChanged {
        delta: EdgeDelta,
        post_id: Uuid,
        community_id: Uuid,
    },
}

impl SyncEvent {
    /// The snake_case event type string for this variant.
    pub fn event_type(&self) -> &'static str {
        match self {
            SyncEvent::UserSaved { .. } => "user_saved",
            SyncEvent::PostSaved { .. } => "post_saved",
            SyncEvent::CommunitySaved { .. } => "community_saved",
            SyncEvent::FollowChanged { .. } => "follow_changed",
            SyncEvent::LikeChanged { .. } => "like_changed",
            SyncEvent::MembershipChanged { .. } => "membership_changed",
            SyncEvent::ModeratorChanged { .. } => "moderator_changed",
            SyncEvent::CommunityPostChanged { .. } => "community_post_changed",
        }
    }

    /// Serialize this event to a JSON Value for the outbox payload.
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("SyncEvent serialization should never fail")
    }

    /// Deserialize an event from an outbox payload.
    pub fn from_payload(payload: &serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(payload.clone())
    }
}

/// Decompose a list mutation (e.g. a hive's member list replaced wholesale)
/// into per-id deltas: `(added, removed)` relative to `before`.
pub fn diff_ids(before: &[Uuid], after: &[Uuid]) -> (Vec<Uuid>, Vec<Uuid>) {
    let before_set: HashSet<Uuid> = before.iter().copied().collect();
    let after_set: HashSet<Uuid> = after.iter().copied().collect();

    let added = after.iter().copied().filter(|id| !before_set.contains(id)).collect();
    let removed = before.iter().copied().filter(|id| !after_set.contains(id)).collect();
    (added, removed)
}
