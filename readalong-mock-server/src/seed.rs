use readalong_api::{CommentId, ScopeId, Time, UserId};

/// Initial content of a mock server, as produced by `generate-test-data`
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Seed {
    pub scope: ScopeId,
    pub users: Vec<SeedUser>,
    pub comments: Vec<SeedComment>,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SeedUser {
    pub id: UserId,
    pub name: String,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedComment {
    pub id: CommentId,
    pub author: UserId,
    pub text: String,
    pub progress_percentage: u8,
    pub created_at: Time,
    pub parent_id: Option<CommentId>,

    /// Likes from users not part of the seed
    #[serde(default)]
    pub like_count: u64,
}
