use uuid::Uuid;

use crate::{Error, Time, UserId, STUB_UUID};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CommentId(pub Uuid);

impl CommentId {
    pub fn stub() -> CommentId {
        CommentId(STUB_UUID)
    }
}

/// Identifies the shared reading activity a discussion belongs to
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct ScopeId(pub Uuid);

impl ScopeId {
    pub fn stub() -> ScopeId {
        ScopeId(STUB_UUID)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    pub author_id: UserId,
    pub author_display_name: String,

    /// Reading progress of the author when they wrote this comment, from 0 to 100
    pub progress_percentage: u8,

    pub like_count: u64,
    pub liked_by_current_user: bool,
    pub created_at: Time,

    /// None for a comment at the root of the discussion
    pub parent_id: Option<CommentId>,

    /// Child comments, possibly only the first few of them
    #[serde(default)]
    pub replies: Vec<Comment>,

    /// Number of direct children on the server, which can be more than `replies.len()`
    pub total_reply_count: u64,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub scope: ScopeId,
    pub text: String,
    pub progress_percentage: u8,
    pub parent_comment_id: Option<CommentId>,
}

impl NewComment {
    // See comments on `validate_string` in lib.rs
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_comment_text(&self.text)?;
        crate::validate_progress(self.progress_percentage)
    }
}
