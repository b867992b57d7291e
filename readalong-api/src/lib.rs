use chrono::Utc;

pub use uuid::{uuid, Uuid};
pub type Time = chrono::DateTime<Utc>;

pub const STUB_UUID: Uuid = uuid!("ffffffff-ffff-ffff-ffff-ffffffffffff");

mod api;
pub use api::Api;

mod auth;
pub use auth::{AuthToken, Credentials};

mod comment;
pub use comment::{Comment, CommentId, NewComment, ScopeId};

mod error;
pub use error::Error;

mod reader;
pub use reader::{Reader, ReadingStatus};

mod response;
pub use response::{
    CommentPage, MessageResponse, ReplyPage, StatusResponse, MSG_COMMENT_ADDED, MSG_COMMENT_LIKED,
    MSG_COMMENT_UNLIKED, STATUS_SUCCESS,
};

mod sort;
pub use sort::SortMode;

mod user;
pub use user::UserId;

// Functions to validate that data is reasonable and can be sent to the server.
// The server refuses anything that fails these checks, so clients should check
// before submitting to fail early.

pub fn validate_string(s: &str) -> Result<(), Error> {
    if s.contains('\0') {
        return Err(Error::NullByteInString(String::from(s)));
    }
    Ok(())
}

pub fn validate_comment_text(s: &str) -> Result<(), Error> {
    if s.trim().is_empty() {
        return Err(Error::EmptyText);
    }
    validate_string(s)
}

pub fn validate_progress(p: u8) -> Result<(), Error> {
    if p > 100 {
        return Err(Error::InvalidProgress(p));
    }
    Ok(())
}
