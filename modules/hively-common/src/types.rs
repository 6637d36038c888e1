use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Enums ---

/// Who may see a post. Only `Public` posts are eligible for recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    FollowersOnly,
    Private,
    CommunityOnly,
}

impl Visibility {
    /// The string stored on the Post node's `visibility` property.
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::FollowersOnly => "followers_only",
            Visibility::Private => "private",
            Visibility::CommunityOnly => "community_only",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Visibility::Public),
            "followers_only" => Some(Visibility::FollowersOnly),
            "private" => Some(Visibility::Private),
            "community_only" => Some(Visibility::CommunityOnly),
            _ => None,
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Record mirrors (primary store → graph node) ---

/// The slice of a user document mirrored into the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// The slice of a post document mirrored into the graph.
/// `username` is the author's username, denormalized so recommendation
/// results can be serialized without a lookup back to the primary store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: Uuid,
    pub heading: String,
    pub content: String,
    pub user_id: Uuid,
    pub username: String,
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
}

/// The slice of a hive (community) document mirrored into the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityRecord {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

// --- Recommendation results ---

/// A ranked post candidate. Score is a weighted signal count, meaningful
/// only relative to other candidates in the same response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecommendation {
    pub post_id: Uuid,
    pub heading: String,
    pub content: String,
    pub username: String,
    pub user_id: Uuid,
    pub score: i64,
}

/// A ranked friend candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendRecommendation {
    pub user_id: Uuid,
    pub username: String,
    pub name: String,
    pub score: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_roundtrip() {
        for v in [
            Visibility::Public,
            Visibility::FollowersOnly,
            Visibility::Private,
            Visibility::CommunityOnly,
        ] {
            assert_eq!(Visibility::parse(v.as_str()), Some(v));
        }
        assert_eq!(Visibility::parse("friends_of_friends"), None);
    }

    #[test]
    fn visibility_serde_matches_as_str() {
        let json = serde_json::to_value(Visibility::FollowersOnly).unwrap();
        assert_eq!(json.as_str().unwrap(), "followers_only");
    }
}
