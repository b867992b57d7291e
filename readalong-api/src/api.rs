use async_trait::async_trait;

use crate::{
    AuthToken, CommentId, CommentPage, Error, MessageResponse, NewComment, ReplyPage, ScopeId,
    SortMode, StatusResponse,
};

/// The remote service holding discussions
///
/// Pages are numbered from 1, and their size is fixed by the server.
#[async_trait]
pub trait Api: Send + Sync {
    async fn fetch_comments(
        &self,
        token: &AuthToken,
        scope: ScopeId,
        page: u32,
        sort: SortMode,
    ) -> Result<CommentPage, Error>;

    async fn fetch_replies(
        &self,
        token: &AuthToken,
        parent: CommentId,
        page: u32,
        sort: SortMode,
    ) -> Result<ReplyPage, Error>;

    async fn submit_comment(
        &self,
        token: &AuthToken,
        comment: NewComment,
    ) -> Result<MessageResponse, Error>;

    async fn toggle_like(
        &self,
        token: &AuthToken,
        comment: CommentId,
    ) -> Result<MessageResponse, Error>;

    async fn delete_comment(
        &self,
        token: &AuthToken,
        comment: CommentId,
    ) -> Result<StatusResponse, Error>;
}

#[async_trait]
impl<T: Api + ?Sized> Api for std::sync::Arc<T> {
    async fn fetch_comments(
        &self,
        token: &AuthToken,
        scope: ScopeId,
        page: u32,
        sort: SortMode,
    ) -> Result<CommentPage, Error> {
        (**self).fetch_comments(token, scope, page, sort).await
    }

    async fn fetch_replies(
        &self,
        token: &AuthToken,
        parent: CommentId,
        page: u32,
        sort: SortMode,
    ) -> Result<ReplyPage, Error> {
        (**self).fetch_replies(token, parent, page, sort).await
    }

    async fn submit_comment(
        &self,
        token: &AuthToken,
        comment: NewComment,
    ) -> Result<MessageResponse, Error> {
        (**self).submit_comment(token, comment).await
    }

    async fn toggle_like(
        &self,
        token: &AuthToken,
        comment: CommentId,
    ) -> Result<MessageResponse, Error> {
        (**self).toggle_like(token, comment).await
    }

    async fn delete_comment(
        &self,
        token: &AuthToken,
        comment: CommentId,
    ) -> Result<StatusResponse, Error> {
        (**self).delete_comment(token, comment).await
    }
}
