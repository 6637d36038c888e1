//! Write-side wrapper for the graph: node upserts and edge create/remove.
//!
//! Every operation is idempotent. Node upserts MERGE on `id` and never
//! touch `created_at` after the first insert. Edge creation MATCHes both
//! endpoints first — if either node is missing the statement affects zero
//! rows instead of erroring, and the next resync heals the gap. Edge
//! removal of an absent edge is a no-op.

use chrono::{DateTime, Utc};
use neo4rs::query;
use tracing::debug;
use uuid::Uuid;

use hively_common::{CommunityRecord, PostRecord, UserRecord};

use crate::GraphClient;

pub struct GraphWriter {
    client: GraphClient,
}

impl GraphWriter {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    // --- Entity sync ---

    /// Create or update a User node. MERGE on id; display fields are
    /// refreshed on re-merge, `created_at` is fixed at first insert.
    pub async fn upsert_user(&self, user: &UserRecord) -> Result<(), neo4rs::Error> {
        let q = query(
            "MERGE (u:User {id: $id})
             ON CREATE SET
                u.name = $name,
                u.username = $username,
                u.email = $email,
                u.created_at = datetime($created_at)
             ON MATCH SET
                u.name = $name,
                u.username = $username,
                u.email = $email",
        )
        .param("id", user.id.to_string())
        .param("name", user.name.as_str())
        .param("username", user.username.as_str())
        .param("email", user.email.as_str())
        .param("created_at", format_datetime(&user.created_at));

        self.client.graph.run(q).await?;
        debug!(user_id = %user.id, username = user.username.as_str(), "User node upserted");
        Ok(())
    }

    /// Create or update a Post node and its POSTED edge from the author.
    /// If the author node is missing, the post is still upserted and the
    /// edge is skipped (zero rows matched).
    pub async fn upsert_post(&self, post: &PostRecord) -> Result<(), neo4rs::Error> {
        let q = query(
            "MERGE (p:Post {id: $id})
             ON CREATE SET
                p.heading = $heading,
                p.content = $content,
                p.user_id = $user_id,
                p.username = $username,
                p.visibility = $visibility,
                p.created_at = datetime($created_at)
             ON MATCH SET
                p.heading = $heading,
                p.content = $content,
                p.username = $username,
                p.visibility = $visibility
             WITH p
             MATCH (u:User {id: $user_id})
             MERGE (u)-[:POSTED]->(p)",
        )
        .param("id", post.id.to_string())
        .param("heading", post.heading.as_str())
        .param("content", post.content.as_str())
        .param("user_id", post.user_id.to_string())
        .param("username", post.username.as_str())
        .param("visibility", post.visibility.as_str())
        .param("created_at", format_datetime(&post.created_at));

        self.client.graph.run(q).await?;
        debug!(post_id = %post.id, visibility = post.visibility.as_str(), "Post node upserted");
        Ok(())
    }

    /// Create or update a Community (hive) node. MERGE on id.
    pub async fn upsert_community(&self, community: &CommunityRecord) -> Result<(), neo4rs::Error> {
        let q = query(
            "MERGE (c:Community {id: $id})
             ON CREATE SET
                c.name = $name,
                c.created_at = datetime($created_at)
             ON MATCH SET
                c.name = $name",
        )
        .param("id", community.id.to_string())
        .param("name", community.name.as_str())
        .param("created_at", format_datetime(&community.created_at));

        self.client.graph.run(q).await?;
        debug!(community_id = %community.id, "Community node upserted");
        Ok(())
    }

    // --- Relationship sync ---

    /// (follower)-[:FOLLOWS]->(followee). Safe to call repeatedly.
    pub async fn follow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<(), neo4rs::Error> {
        self.create_edge("User", follower_id, "FOLLOWS", "User", followee_id).await
    }

    /// Remove the FOLLOWS edge if present.
    pub async fn unfollow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<(), neo4rs::Error> {
        self.remove_edge("User", follower_id, "FOLLOWS", "User", followee_id).await
    }

    /// (user)-[:LIKES]->(post).
    pub async fn like(&self, user_id: Uuid, post_id: Uuid) -> Result<(), neo4rs::Error> {
        self.create_edge("User", user_id, "LIKES", "Post", post_id).await
    }

    /// Remove the LIKES edge if present.
    pub async fn unlike(&self, user_id: Uuid, post_id: Uuid) -> Result<(), neo4rs::Error> {
        self.remove_edge("User", user_id, "LIKES", "Post", post_id).await
    }

    /// (user)-[:MEMBER_OF]->(community).
    pub async fn add_member(&self, user_id: Uuid, community_id: Uuid) -> Result<(), neo4rs::Error> {
        self.create_edge("User", user_id, "MEMBER_OF", "Community", community_id).await
    }

    pub async fn remove_member(&self, user_id: Uuid, community_id: Uuid) -> Result<(), neo4rs::Error> {
        self.remove_edge("User", user_id, "MEMBER_OF", "Community", community_id).await
    }

    /// (user)-[:MODERATES]->(community).
    pub async fn add_moderator(&self, user_id: Uuid, community_id: Uuid) -> Result<(), neo4rs::Error> {
        self.create_edge("User", user_id, "MODERATES", "Community", community_id).await
    }

    pub async fn remove_moderator(&self, user_id: Uuid, community_id: Uuid) -> Result<(), neo4rs::Error> {
        self.remove_edge("User", user_id, "MODERATES", "Community", community_id).await
    }

    /// (post)-[:IN_COMMUNITY]->(community).
    pub async fn add_post_to_community(&self, post_id: Uuid, community_id: Uuid) -> Result<(), neo4rs::Error> {
        self.create_edge("Post", post_id, "IN_COMMUNITY", "Community", community_id).await
    }

    pub async fn remove_post_from_community(&self, post_id: Uuid, community_id: Uuid) -> Result<(), neo4rs::Error> {
        self.remove_edge("Post", post_id, "IN_COMMUNITY", "Community", community_id).await
    }

    // --- Shared edge plumbing ---

    /// MATCH both endpoints by id, MERGE the edge. Labels and relationship
    /// types are compile-time literals from the callers above, never input.
    async fn create_edge(
        &self,
        from_label: &str,
        from_id: Uuid,
        rel: &str,
        to_label: &str,
        to_id: Uuid,
    ) -> Result<(), neo4rs::Error> {
        let cypher = format!(
            "MATCH (a:{from_label} {{id: $from_id}})
             MATCH (b:{to_label} {{id: $to_id}})
             MERGE (a)-[:{rel}]->(b)"
        );
        let q = query(&cypher)
            .param("from_id", from_id.to_string())
            .param("to_id", to_id.to_string());

        self.client.graph.run(q).await?;
        debug!(rel, from = %from_id, to = %to_id, "Edge merged");
        Ok(())
    }

    /// MATCH the specific edge and delete it. Absent edge: zero rows, no error.
    async fn remove_edge(
        &self,
        from_label: &str,
        from_id: Uuid,
        rel: &str,
        to_label: &str,
        to_id: Uuid,
    ) -> Result<(), neo4rs::Error> {
        let cypher = format!(
            "MATCH (a:{from_label} {{id: $from_id}})-[r:{rel}]->(b:{to_label} {{id: $to_id}})
             DELETE r"
        );
        let q = query(&cypher)
            .param("from_id", from_id.to_string())
            .param("to_id", to_id.to_string());

        self.client.graph.run(q).await?;
        debug!(rel, from = %from_id, to = %to_id, "Edge removed");
        Ok(())
    }
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}
