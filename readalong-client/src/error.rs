use crate::api::{self, CommentId};

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("A like for comment {0:?} is already being submitted")]
    LikeInFlight(CommentId),
}

impl From<api::Error> for Error {
    fn from(e: api::Error) -> Error {
        match e {
            api::Error::Network(msg) => Error::Network(msg),
            e => Error::Server(e.to_string()),
        }
    }
}
