//! Event → graph dispatch with the subsystem's failure-isolation rule:
//! a graph write that fails is logged and dropped, never propagated back
//! toward the primary-store write that triggered it. Recommendation
//! freshness may lag; core CRUD never depends on graph availability.

use tracing::warn;

use hively_common::{EdgeDelta, SyncEvent};

use crate::writer::GraphWriter;

pub struct GraphProjector {
    writer: GraphWriter,
}

impl GraphProjector {
    pub fn new(writer: GraphWriter) -> Self {
        Self { writer }
    }

    /// Apply an event, swallowing any graph error. The only entry point
    /// the write path and the outbox tailer use.
    pub async fn apply(&self, event: &SyncEvent) {
        if let Err(e) = self.project(event).await {
            warn!(
                error = %e,
                event_type = event.event_type(),
                "graph sync failed; projection lags until next resync"
            );
        }
    }

    /// Dispatch an event to the writer, surfacing the error.
    async fn project(&self, event: &SyncEvent) -> Result<(), neo4rs::Error> {
        match event {
            SyncEvent::UserSaved { user } => self.writer.upsert_user(user).await,

            SyncEvent::PostSaved { post } => self.writer.upsert_post(post).await,

            SyncEvent::CommunitySaved { community } => {
                self.writer.upsert_community(community).await
            }

            SyncEvent::FollowChanged { delta, follower_id, followee_id } => {
                if follower_id == followee_id {
                    // A user cannot follow themselves; refuse rather than write.
                    warn!(user_id = %follower_id, "self-follow event refused");
                    return Ok(());
                }
                match delta {
                    EdgeDelta::Added => self.writer.follow(*follower_id, *followee_id).await,
                    EdgeDelta::Removed => self.writer.unfollow(*follower_id, *followee_id).await,
                }
            }

            SyncEvent::LikeChanged { delta, user_id, post_id } => match delta {
                EdgeDelta::Added => self.writer.like(*user_id, *post_id).await,
                EdgeDelta::Removed => self.writer.unlike(*user_id, *post_id).await,
            },

            SyncEvent::MembershipChanged { delta, user_id, community_id } => match delta {
                EdgeDelta::Added => self.writer.add_member(*user_id, *community_id).await,
                EdgeDelta::Removed => self.writer.remove_member(*user_id, *community_id).await,
            },

            SyncEvent::ModeratorChanged { delta, user_id, community_id } => match delta {
                EdgeDelta::Added => self.writer.add_moderator(*user_id, *community_id).await,
                EdgeDelta::Removed => self.writer.remove_moderator(*user_id, *community_id).await,
            },

            SyncEvent::CommunityPostChanged { delta, post_id, community_id } => match delta {
                EdgeDelta::Added => {
                    self.writer.add_post_to_community(*post_id, *community_id).await
                }
                EdgeDelta::Removed => {
                    self.writer.remove_post_from_community(*post_id, *community_id).await
                }
            },
        }
    }
}
