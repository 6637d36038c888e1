//! Full rebuild of the graph from the primary store.
//!
//! Coarse full-table-scan operation for initial population or recovery
//! from drift — not for steady-state use. Every step is MERGE-based, so
//! re-running against an already-populated graph changes nothing. Unlike
//! the event path, failures here propagate: an admin asked for a rebuild
//! and needs to know it did not complete.

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use hively_common::PrimaryStore;

use crate::migrate;
use crate::writer::GraphWriter;
use crate::GraphClient;

/// Counts of synced entities and edges, returned to the admin caller.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ResyncStats {
    pub users: u64,
    pub posts: u64,
    pub communities: u64,
    pub follows: u64,
    pub likes: u64,
    pub memberships: u64,
    pub moderators: u64,
    pub community_posts: u64,
}

/// Rebuild the graph's constraints and content from the primary store.
pub async fn resync(
    store: &dyn PrimaryStore,
    writer: &GraphWriter,
    client: &GraphClient,
) -> Result<ResyncStats> {
    let mut stats = ResyncStats::default();

    migrate::migrate(client).await?;

    // Nodes before edges: every edge MATCHes both endpoints.
    for user in store.users().await? {
        writer.upsert_user(&user).await?;
        stats.users += 1;
    }

    let communities = store.communities().await?;
    for state in &communities {
        writer.upsert_community(&state.community).await?;
        stats.communities += 1;
    }

    for post in store.posts().await? {
        writer.upsert_post(&post).await?;
        stats.posts += 1;
    }

    for (follower_id, followee_id) in store.follows().await? {
        if follower_id == followee_id {
            continue;
        }
        writer.follow(follower_id, followee_id).await?;
        stats.follows += 1;
    }

    for (user_id, post_id) in store.likes().await? {
        writer.like(user_id, post_id).await?;
        stats.likes += 1;
    }

    for state in &communities {
        let community_id = state.community.id;
        for user_id in &state.member_ids {
            writer.add_member(*user_id, community_id).await?;
            stats.memberships += 1;
        }
        for user_id in &state.moderator_ids {
            writer.add_moderator(*user_id, community_id).await?;
            stats.moderators += 1;
        }
        for post_id in &state.post_ids {
            writer.add_post_to_community(*post_id, community_id).await?;
            stats.community_posts += 1;
        }
    }

    info!(
        users = stats.users,
        posts = stats.posts,
        communities = stats.communities,
        follows = stats.follows,
        likes = stats.likes,
        "Graph resync complete"
    );

    Ok(stats)
}
