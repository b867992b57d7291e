use crate::CommentId;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Comment not found {0:?}")]
    CommentNotFound(CommentId),

    #[error("Comment text is empty")]
    EmptyText,

    #[error("Null byte in string is not allowed {0:?}")]
    NullByteInString(String),

    #[error("Progress percentage must be at most 100, got {0}")]
    InvalidProgress(u8),
}
