//! Postgres-backed PrimaryStore. Read-only from this subsystem's point of
//! view: the main application owns the schema and all writes; resync only
//! scans these tables to rebuild the graph.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use hively_common::{
    CommunityRecord, CommunityState, HivelyError, PostRecord, PrimaryStore, StoreResult,
    UserRecord, Visibility,
};

fn db_err(e: sqlx::Error) -> HivelyError {
    HivelyError::Database(e.to_string())
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    username: String,
    email: String,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    heading: String,
    content: String,
    user_id: Uuid,
    username: String,
    visibility: String,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct CommunityRow {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl PrimaryStore for PgStore {
    async fn users(&self) -> StoreResult<Vec<UserRecord>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, username, email, created_at FROM users",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|r| UserRecord {
                id: r.id,
                name: r.name,
                username: r.username,
                email: r.email,
                created_at: r.created_at,
            })
            .collect())
    }

    async fn posts(&self) -> StoreResult<Vec<PostRecord>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT p.id, p.heading, p.content, p.user_id, u.username, p.visibility, p.created_at
            FROM posts p
            JOIN users u ON u.id = p.user_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .filter_map(|r| {
                // A row with an unknown visibility string is skipped rather
                // than guessed public.
                let visibility = Visibility::parse(&r.visibility)?;
                Some(PostRecord {
                    id: r.id,
                    heading: r.heading,
                    content: r.content,
                    user_id: r.user_id,
                    username: r.username,
                    visibility,
                    created_at: r.created_at,
                })
            })
            .collect())
    }

    async fn communities(&self) -> StoreResult<Vec<CommunityState>> {
        let communities = sqlx::query_as::<_, CommunityRow>(
            "SELECT id, name, created_at FROM communities",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let members = sqlx::query_as::<_, (Uuid, Uuid, bool)>(
            "SELECT community_id, user_id, is_moderator FROM community_members",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let community_posts = sqlx::query_as::<_, (Uuid, Uuid)>(
            "SELECT community_id, post_id FROM community_posts",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(communities
            .into_iter()
            .map(|c| {
                let member_ids = members
                    .iter()
                    .filter(|(cid, _, _)| *cid == c.id)
                    .map(|(_, uid, _)| *uid)
                    .collect();
                let moderator_ids = members
                    .iter()
                    .filter(|(cid, _, is_mod)| *cid == c.id && *is_mod)
                    .map(|(_, uid, _)| *uid)
                    .collect();
                let post_ids = community_posts
                    .iter()
                    .filter(|(cid, _)| *cid == c.id)
                    .map(|(_, pid)| *pid)
                    .collect();

                CommunityState {
                    community: CommunityRecord {
                        id: c.id,
                        name: c.name,
                        created_at: c.created_at,
                    },
                    member_ids,
                    moderator_ids,
                    post_ids,
                }
            })
            .collect())
    }

    async fn follows(&self) -> StoreResult<Vec<(Uuid, Uuid)>> {
        let rows = sqlx::query_as::<_, (Uuid, Uuid)>(
            "SELECT follower_id, followee_id FROM follows",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(rows)
    }

    async fn likes(&self) -> StoreResult<Vec<(Uuid, Uuid)>> {
        let rows = sqlx::query_as::<_, (Uuid, Uuid)>(
            "SELECT user_id, post_id FROM post_likes",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(rows)
    }
}
