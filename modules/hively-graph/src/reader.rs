//! Read-only recommendation queries. Used by the web server.
//!
//! Each recommendation blends two graph signals. One Cypher query runs per
//! signal; the counts are combined, weighted, and ranked in Rust. Query
//! failures propagate to the caller — a recommendation response is either
//! a full ranked list or an explicit error, never a partial fabrication.

use std::collections::HashMap;

use neo4rs::query;
use uuid::Uuid;

use hively_common::{FriendRecommendation, PostRecommendation};

use crate::GraphClient;

/// Signal weights. Social-follow signal outranks taste-similarity signal.
const POST_SIMILARITY_WEIGHT: i64 = 2;
const POST_FOLLOWED_WEIGHT: i64 = 3;
const FRIEND_MUTUAL_WEIGHT: i64 = 2;
const FRIEND_SHARED_LIKE_WEIGHT: i64 = 1;

pub struct RecommendationReader {
    client: GraphClient,
}

impl RecommendationReader {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    /// Ranked public-post candidates for a user.
    ///
    /// Signal 1 (social): posts liked by followed users, counted by how
    /// many followed users liked each. Signal 2 (similarity): posts liked
    /// by users who share at least one like with the requester, counted by
    /// distinct co-likers. Posts the requester already liked and non-public
    /// posts are never candidates. A user with no follows and no likes
    /// gets an empty list.
    pub async fn recommend_posts(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> Result<Vec<PostRecommendation>, neo4rs::Error> {
        let followed = self
            .post_signal(
                user_id,
                "MATCH (u:User {id: $user_id})-[:FOLLOWS]->(f:User)-[:LIKES]->(p:Post)
                 WHERE p.visibility = 'public' AND NOT (u)-[:LIKES]->(p)
                 RETURN p.id AS post_id, p.heading AS heading, p.content AS content,
                        p.username AS username, p.user_id AS author_id,
                        count(DISTINCT f) AS cnt",
            )
            .await?;

        let similar = self
            .post_signal(
                user_id,
                "MATCH (u:User {id: $user_id})-[:LIKES]->(:Post)<-[:LIKES]-(s:User)-[:LIKES]->(p:Post)
                 WHERE s.id <> $user_id AND p.visibility = 'public' AND NOT (u)-[:LIKES]->(p)
                 RETURN p.id AS post_id, p.heading AS heading, p.content AS content,
                        p.username AS username, p.user_id AS author_id,
                        count(DISTINCT s) AS cnt",
            )
            .await?;

        Ok(blend_posts(followed, similar, limit))
    }

    /// Ranked friend candidates for a user.
    ///
    /// Signal 1 (friend-of-friend): users followed by the requester's
    /// followees, counted by mutual connectors. Signal 2 (shared interest):
    /// co-likers, counted by shared liked posts. Self and already-followed
    /// users are never candidates.
    pub async fn recommend_friends(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> Result<Vec<FriendRecommendation>, neo4rs::Error> {
        let mutuals = self
            .friend_signal(
                user_id,
                "MATCH (u:User {id: $user_id})-[:FOLLOWS]->(mid:User)-[:FOLLOWS]->(c:User)
                 WHERE c.id <> $user_id AND NOT (u)-[:FOLLOWS]->(c)
                 RETURN c.id AS candidate_id, c.username AS username, c.name AS name,
                        count(DISTINCT mid) AS cnt",
            )
            .await?;

        let co_likers = self
            .friend_signal(
                user_id,
                "MATCH (u:User {id: $user_id})-[:LIKES]->(p:Post)<-[:LIKES]-(c:User)
                 WHERE c.id <> $user_id AND NOT (u)-[:FOLLOWS]->(c)
                 RETURN c.id AS candidate_id, c.username AS username, c.name AS name,
                        count(DISTINCT p) AS cnt",
            )
            .await?;

        Ok(blend_friends(mutuals, co_likers, limit))
    }

    async fn post_signal(
        &self,
        user_id: Uuid,
        cypher: &str,
    ) -> Result<Vec<PostSignal>, neo4rs::Error> {
        let q = query(cypher).param("user_id", user_id.to_string());
        let mut stream = self.client.graph.execute(q).await?;

        let mut rows = Vec::new();
        while let Some(row) = stream.next().await? {
            let id_str: String = row.get("post_id").unwrap_or_default();
            let author_str: String = row.get("author_id").unwrap_or_default();
            let (Ok(post_id), Ok(author_id)) =
                (Uuid::parse_str(&id_str), Uuid::parse_str(&author_str))
            else {
                continue;
            };

            rows.push(PostSignal {
                post_id,
                heading: row.get("heading").unwrap_or_default(),
                content: row.get("content").unwrap_or_default(),
                username: row.get("username").unwrap_or_default(),
                author_id,
                count: row.get("cnt").unwrap_or(0),
            });
        }
        Ok(rows)
    }

    async fn friend_signal(
        &self,
        user_id: Uuid,
        cypher: &str,
    ) -> Result<Vec<FriendSignal>, neo4rs::Error> {
        let q = query(cypher).param("user_id", user_id.to_string());
        let mut stream = self.client.graph.execute(q).await?;

        let mut rows = Vec::new();
        while let Some(row) = stream.next().await? {
            let id_str: String = row.get("candidate_id").unwrap_or_default();
            let Ok(candidate_id) = Uuid::parse_str(&id_str) else {
                continue;
            };

            rows.push(FriendSignal {
                candidate_id,
                username: row.get("username").unwrap_or_default(),
                name: row.get("name").unwrap_or_default(),
                count: row.get("cnt").unwrap_or(0),
            });
        }
        Ok(rows)
    }
}

// --- Signal rows and blending ---

#[derive(Debug, Clone)]
struct PostSignal {
    post_id: Uuid,
    heading: String,
    content: String,
    username: String,
    author_id: Uuid,
    count: i64,
}

#[derive(Debug, Clone)]
struct FriendSignal {
    candidate_id: Uuid,
    username: String,
    name: String,
    count: i64,
}

/// Combine per-post signal counts into one weighted ranking:
/// `score = similarity * 2 + followed * 3`, positive scores only,
/// descending, ties broken by post id for a stable order.
fn blend_posts(
    followed: Vec<PostSignal>,
    similar: Vec<PostSignal>,
    limit: usize,
) -> Vec<PostRecommendation> {
    let mut by_post: HashMap<Uuid, PostRecommendation> = HashMap::new();

    for (signals, weight) in [
        (followed, POST_FOLLOWED_WEIGHT),
        (similar, POST_SIMILARITY_WEIGHT),
    ] {
        for s in signals {
            let entry = by_post.entry(s.post_id).or_insert_with(|| PostRecommendation {
                post_id: s.post_id,
                heading: s.heading.clone(),
                content: s.content.clone(),
                username: s.username.clone(),
                user_id: s.author_id,
                score: 0,
            });
            entry.score += s.count * weight;
        }
    }

    let mut ranked: Vec<PostRecommendation> =
        by_post.into_values().filter(|r| r.score > 0).collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score).then(a.post_id.cmp(&b.post_id)));
    ranked.truncate(limit);
    ranked
}

/// Combine per-candidate signal counts: `score = mutuals * 2 + shared * 1`.
fn blend_friends(
    mutuals: Vec<FriendSignal>,
    co_likers: Vec<FriendSignal>,
    limit: usize,
) -> Vec<FriendRecommendation> {
    let mut by_user: HashMap<Uuid, FriendRecommendation> = HashMap::new();

    for (signals, weight) in [
        (mutuals, FRIEND_MUTUAL_WEIGHT),
        (co_likers, FRIEND_SHARED_LIKE_WEIGHT),
    ] {
        for s in signals {
            let entry = by_user.entry(s.candidate_id).or_insert_with(|| FriendRecommendation {
                user_id: s.candidate_id,
                username: s.username.clone(),
                name: s.name.clone(),
                score: 0,
            });
            entry.score += s.count * weight;
        }
    }

    let mut ranked: Vec<FriendRecommendation> =
        by_user.into_values().filter(|r| r.score > 0).collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score).then(a.user_id.cmp(&b.user_id)));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_signal(post_id: Uuid, count: i64) -> PostSignal {
        PostSignal {
            post_id,
            heading: "h".into(),
            content: "c".into(),
            username: "author".into(),
            author_id: Uuid::new_v4(),
            count,
        }
    }

    fn friend_signal(candidate_id: Uuid, count: i64) -> FriendSignal {
        FriendSignal {
            candidate_id,
            username: "candidate".into(),
            name: "Candidate".into(),
            count,
        }
    }

    #[test]
    fn single_followed_liker_scores_three() {
        let p = Uuid::new_v4();
        let ranked = blend_posts(vec![post_signal(p, 1)], vec![], 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].score, 3);
    }

    #[test]
    fn single_similar_liker_scores_two() {
        let p = Uuid::new_v4();
        let ranked = blend_posts(vec![], vec![post_signal(p, 1)], 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].score, 2);
    }

    #[test]
    fn both_signals_accumulate_on_one_post() {
        let p = Uuid::new_v4();
        let ranked = blend_posts(vec![post_signal(p, 2)], vec![post_signal(p, 3)], 10);
        // 2 followed likers * 3 + 3 similar users * 2
        assert_eq!(ranked[0].score, 12);
    }

    #[test]
    fn ranking_is_descending_and_truncated() {
        let signals: Vec<PostSignal> =
            (1..=5).map(|n| post_signal(Uuid::new_v4(), n)).collect();
        let ranked = blend_posts(signals, vec![], 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].score, 15);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn zero_count_signals_are_filtered() {
        let ranked = blend_posts(vec![post_signal(Uuid::new_v4(), 0)], vec![], 10);
        assert!(ranked.is_empty());
    }

    #[test]
    fn friend_candidate_accumulates_across_signals() {
        let c = Uuid::new_v4();
        let ranked = blend_friends(vec![friend_signal(c, 2)], vec![friend_signal(c, 3)], 10);
        // 2 mutual followees * 2 + 3 shared likes * 1
        assert_eq!(ranked[0].score, 7);
    }

    #[test]
    fn no_signals_yield_empty_list() {
        assert!(blend_posts(vec![], vec![], 10).is_empty());
        assert!(blend_friends(vec![], vec![], 10).is_empty());
    }
}
