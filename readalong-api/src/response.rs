use crate::Comment;

pub const MSG_COMMENT_ADDED: &str = "Comment added";
pub const MSG_COMMENT_LIKED: &str = "Comment liked";
pub const MSG_COMMENT_UNLIKED: &str = "Comment unliked";
pub const STATUS_SUCCESS: &str = "success";

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPage {
    pub comments: Vec<Comment>,
    pub has_more_comments: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyPage {
    pub replies: Vec<Comment>,
    pub has_more_replies: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> MessageResponse {
        MessageResponse {
            message: String::from(message),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn success() -> StatusResponse {
        StatusResponse {
            status: String::from(STATUS_SUCCESS),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}
