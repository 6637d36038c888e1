//! Integration tests for the post and friend recommendation scoring.
//!
//! Requirements: Docker (for Neo4j via testcontainers)
//!
//! Run with: cargo test -p hively-graph --features test-utils --test recommendation_test

#![cfg(feature = "test-utils")]

use chrono::Utc;
use uuid::Uuid;

use hively_common::{PostRecord, UserRecord, Visibility};
use hively_graph::{GraphClient, GraphWriter, RecommendationReader};

async fn setup() -> (impl std::any::Any, GraphClient, GraphWriter, RecommendationReader) {
    let (container, client) = hively_graph::testutil::neo4j_container().await;
    let writer = GraphWriter::new(client.clone());
    let reader = RecommendationReader::new(client.clone());
    (container, client, writer, reader)
}

fn user(name: &str) -> UserRecord {
    UserRecord {
        id: Uuid::new_v4(),
        name: name.to_string(),
        username: name.to_lowercase(),
        email: format!("{}@hively.dev", name.to_lowercase()),
        created_at: Utc::now(),
    }
}

fn post(author: &UserRecord, heading: &str, visibility: Visibility) -> PostRecord {
    PostRecord {
        id: Uuid::new_v4(),
        heading: heading.to_string(),
        content: format!("{heading} content"),
        user_id: author.id,
        username: author.username.clone(),
        visibility,
        created_at: Utc::now(),
    }
}

/// Scenario A: U follows F; F alone liked a public post → score 3.
#[tokio::test]
async fn followed_users_like_scores_three() {
    let (_guard, _client, writer, reader) = setup().await;

    let u = user("U");
    let f = user("F");
    let author = user("Author");
    for record in [&u, &f, &author] {
        writer.upsert_user(record).await.unwrap();
    }
    let p = post(&author, "P", Visibility::Public);
    writer.upsert_post(&p).await.unwrap();

    writer.follow(u.id, f.id).await.unwrap();
    writer.like(f.id, p.id).await.unwrap();

    let recs = reader.recommend_posts(u.id, 10).await.unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].post_id, p.id);
    assert_eq!(recs[0].score, 3);
    assert_eq!(recs[0].username, author.username);
    assert_eq!(recs[0].user_id, author.id);
}

/// Scenario B: U and S share a liked post; S also liked public Y → Y scores 2.
#[tokio::test]
async fn similar_users_like_scores_two() {
    let (_guard, _client, writer, reader) = setup().await;

    let u = user("U");
    let s = user("S");
    let author = user("Author");
    for record in [&u, &s, &author] {
        writer.upsert_user(record).await.unwrap();
    }
    let x = post(&author, "X", Visibility::Public);
    let y = post(&author, "Y", Visibility::Public);
    writer.upsert_post(&x).await.unwrap();
    writer.upsert_post(&y).await.unwrap();

    writer.like(u.id, x.id).await.unwrap();
    writer.like(s.id, x.id).await.unwrap();
    writer.like(s.id, y.id).await.unwrap();

    let recs = reader.recommend_posts(u.id, 10).await.unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].post_id, y.id);
    assert_eq!(recs[0].score, 2);
}

/// Scenario C: a user with no follows and no likes gets an empty list.
#[tokio::test]
async fn isolated_user_gets_no_post_recommendations() {
    let (_guard, _client, writer, reader) = setup().await;

    let u = user("U");
    writer.upsert_user(&u).await.unwrap();

    let recs = reader.recommend_posts(u.id, 10).await.unwrap();
    assert!(recs.is_empty());
}

/// Scenario D: no friend-of-friend paths and no shared likes → empty list.
#[tokio::test]
async fn isolated_user_gets_no_friend_recommendations() {
    let (_guard, _client, writer, reader) = setup().await;

    let u = user("U");
    writer.upsert_user(&u).await.unwrap();

    let recs = reader.recommend_friends(u.id, 10).await.unwrap();
    assert!(recs.is_empty());
}

#[tokio::test]
async fn already_liked_posts_are_excluded_regardless_of_signal_strength() {
    let (_guard, _client, writer, reader) = setup().await;

    let u = user("U");
    let f = user("F");
    let g = user("G");
    let author = user("Author");
    for record in [&u, &f, &g, &author] {
        writer.upsert_user(record).await.unwrap();
    }
    let p = post(&author, "P", Visibility::Public);
    writer.upsert_post(&p).await.unwrap();

    writer.follow(u.id, f.id).await.unwrap();
    writer.follow(u.id, g.id).await.unwrap();
    writer.like(f.id, p.id).await.unwrap();
    writer.like(g.id, p.id).await.unwrap();
    writer.like(u.id, p.id).await.unwrap();

    let recs = reader.recommend_posts(u.id, 10).await.unwrap();
    assert!(recs.is_empty(), "already-liked post was recommended: {recs:?}");
}

#[tokio::test]
async fn non_public_posts_are_never_recommended() {
    let (_guard, _client, writer, reader) = setup().await;

    let u = user("U");
    let f = user("F");
    let author = user("Author");
    for record in [&u, &f, &author] {
        writer.upsert_user(record).await.unwrap();
    }

    writer.follow(u.id, f.id).await.unwrap();
    for visibility in [
        Visibility::FollowersOnly,
        Visibility::Private,
        Visibility::CommunityOnly,
    ] {
        let p = post(&author, "hidden", visibility);
        writer.upsert_post(&p).await.unwrap();
        writer.like(f.id, p.id).await.unwrap();
    }

    let recs = reader.recommend_posts(u.id, 10).await.unwrap();
    assert!(recs.is_empty(), "non-public post was recommended: {recs:?}");
}

/// Adding a follow that connects another liker of a candidate post must not
/// decrease the post's score.
#[tokio::test]
async fn social_score_is_monotone_in_connected_likers() {
    let (_guard, _client, writer, reader) = setup().await;

    let u = user("U");
    let f = user("F");
    let g = user("G");
    let author = user("Author");
    for record in [&u, &f, &g, &author] {
        writer.upsert_user(record).await.unwrap();
    }
    let p = post(&author, "P", Visibility::Public);
    writer.upsert_post(&p).await.unwrap();

    writer.follow(u.id, f.id).await.unwrap();
    writer.like(f.id, p.id).await.unwrap();
    writer.like(g.id, p.id).await.unwrap();

    let before = reader.recommend_posts(u.id, 10).await.unwrap();
    assert_eq!(before[0].score, 3);

    writer.follow(u.id, g.id).await.unwrap();

    let after = reader.recommend_posts(u.id, 10).await.unwrap();
    assert!(
        after[0].score >= before[0].score,
        "score decreased after a connecting follow: {} -> {}",
        before[0].score,
        after[0].score
    );
    assert_eq!(after[0].score, 6);
}

#[tokio::test]
async fn post_ranking_is_descending_and_truncated_to_limit() {
    let (_guard, _client, writer, reader) = setup().await;

    let u = user("U");
    let author = user("Author");
    writer.upsert_user(&u).await.unwrap();
    writer.upsert_user(&author).await.unwrap();

    // Posts liked by 1, 2 and 3 followed users respectively.
    let mut posts = Vec::new();
    for liked_by in 1..=3 {
        let p = post(&author, &format!("liked by {liked_by}"), Visibility::Public);
        writer.upsert_post(&p).await.unwrap();
        for i in 0..liked_by {
            let follower = user(&format!("F{liked_by}{i}"));
            writer.upsert_user(&follower).await.unwrap();
            writer.follow(u.id, follower.id).await.unwrap();
            writer.like(follower.id, p.id).await.unwrap();
        }
        posts.push(p);
    }

    let recs = reader.recommend_posts(u.id, 2).await.unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].post_id, posts[2].id);
    assert_eq!(recs[0].score, 9);
    assert_eq!(recs[1].post_id, posts[1].id);
    assert_eq!(recs[1].score, 6);
}

#[tokio::test]
async fn friend_of_friend_scores_two_per_mutual_connection() {
    let (_guard, _client, writer, reader) = setup().await;

    let u = user("U");
    let mid = user("Mid");
    let candidate = user("Candidate");
    for record in [&u, &mid, &candidate] {
        writer.upsert_user(record).await.unwrap();
    }

    writer.follow(u.id, mid.id).await.unwrap();
    writer.follow(mid.id, candidate.id).await.unwrap();

    let recs = reader.recommend_friends(u.id, 10).await.unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].user_id, candidate.id);
    assert_eq!(recs[0].score, 2);
    assert_eq!(recs[0].username, candidate.username);
}

#[tokio::test]
async fn friend_signals_accumulate_and_exclude_already_followed() {
    let (_guard, _client, writer, reader) = setup().await;

    let u = user("U");
    let mid = user("Mid");
    let candidate = user("Candidate");
    let author = user("Author");
    for record in [&u, &mid, &candidate, &author] {
        writer.upsert_user(record).await.unwrap();
    }
    let p = post(&author, "Shared taste", Visibility::Public);
    writer.upsert_post(&p).await.unwrap();

    // Candidate reachable both as friend-of-friend (×2) and co-liker (×1).
    writer.follow(u.id, mid.id).await.unwrap();
    writer.follow(mid.id, candidate.id).await.unwrap();
    writer.like(u.id, p.id).await.unwrap();
    writer.like(candidate.id, p.id).await.unwrap();

    let recs = reader.recommend_friends(u.id, 10).await.unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].score, 3);

    // Once followed, the candidate disappears from recommendations.
    writer.follow(u.id, candidate.id).await.unwrap();
    let recs = reader.recommend_friends(u.id, 10).await.unwrap();
    assert!(recs.is_empty(), "already-followed user was recommended: {recs:?}");
}

/// Mid also follows U itself; the requester must never be their own candidate.
#[tokio::test]
async fn requester_is_never_a_friend_candidate() {
    let (_guard, _client, writer, reader) = setup().await;

    let u = user("U");
    let mid = user("Mid");
    writer.upsert_user(&u).await.unwrap();
    writer.upsert_user(&mid).await.unwrap();

    writer.follow(u.id, mid.id).await.unwrap();
    writer.follow(mid.id, u.id).await.unwrap();

    let recs = reader.recommend_friends(u.id, 10).await.unwrap();
    assert!(recs.is_empty(), "requester recommended to themselves: {recs:?}");
}
