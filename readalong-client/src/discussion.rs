use parking_lot::Mutex;

use crate::{
    api::{
        Api, AuthToken, Comment, CommentId, Credentials, NewComment, Reader, SortMode,
        MSG_COMMENT_ADDED,
    },
    reduce, Action, DiscussionConfig, DiscussionState, Error, Notice, Phase, Scope,
};

/// Proof that the user confirmed they want to delete a comment
///
/// Obtained from `Discussion::request_delete`, dropping it cancels the deletion.
#[derive(Debug, Eq, PartialEq)]
pub struct DeleteConfirmation {
    comment: CommentId,
}

impl DeleteConfirmation {
    pub fn comment(&self) -> CommentId {
        self.comment
    }
}

/// Outcome of a like toggle that was accepted
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LikeOutcome {
    Confirmed,
    RolledBack,
    /// The comment is not in the tree, nothing was sent
    Skipped,
}

/// Client-held view of one discussion, and sole owner of its comment tree
///
/// All methods take `&self`: the state lock is only held between network
/// round-trips, so operations on different scopes can be in flight at the
/// same time.
pub struct Discussion<A, C> {
    pub(crate) api: A,
    credentials: C,
    config: DiscussionConfig,
    reader: Mutex<Reader>,
    pub(crate) state: Mutex<DiscussionState>,
}

impl<A: Api, C: Credentials> Discussion<A, C> {
    pub fn new(
        api: A,
        credentials: C,
        config: DiscussionConfig,
        reader: Reader,
    ) -> Discussion<A, C> {
        let state = DiscussionState::new(config.page_size, config.sort);
        Discussion {
            api,
            credentials,
            config,
            reader: Mutex::new(reader),
            state: Mutex::new(state),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn credentials(&self) -> &C {
        &self.credentials
    }

    pub fn config(&self) -> &DiscussionConfig {
        &self.config
    }

    pub fn state(&self) -> DiscussionState {
        self.state.lock().clone()
    }

    pub fn phase(&self) -> Phase {
        self.state.lock().phase()
    }

    pub fn sort(&self) -> SortMode {
        self.state.lock().sort
    }

    /// Nested view of the loaded comments
    pub fn view(&self) -> Vec<Comment> {
        self.state.lock().tree.view()
    }

    pub fn reader(&self) -> Reader {
        self.reader.lock().clone()
    }

    pub fn set_reader(&self, reader: Reader) {
        *self.reader.lock() = reader;
    }

    pub fn is_hidden(&self, comment: &Comment) -> bool {
        crate::visibility::is_hidden(comment, &self.reader.lock())
    }

    /// Collect the notices queued since the last call
    pub fn take_notices(&self) -> Vec<Notice> {
        let mut state = self.state.lock();
        let notices = state.notices.iter().cloned().collect();
        *state = reduce(&state, Action::NoticesCleared);
        notices
    }

    pub(crate) fn dispatch(&self, action: Action) {
        let mut state = self.state.lock();
        *state = reduce(&state, action);
    }

    pub(crate) fn token(&self) -> Result<AuthToken, Error> {
        self.credentials.bearer().ok_or(Error::Unauthenticated)
    }

    /// Replace the tree with the first page of root comments
    pub async fn load_root(&self) -> Result<(), Error> {
        let sort = self.sort();
        self.load_root_with(sort).await
    }

    /// Retry after a failed root load
    pub async fn retry(&self) -> Result<(), Error> {
        self.load_root().await
    }

    pub async fn load_root_with(&self, sort: SortMode) -> Result<(), Error> {
        let generation = {
            let mut state = self.state.lock();
            *state = reduce(&state, Action::RootRequested { sort });
            state.generation
        };
        let res = match self.token() {
            Ok(token) => self
                .api
                .fetch_comments(&token, self.config.scope, 1, sort)
                .await
                .map_err(Error::from),
            Err(e) => Err(e),
        };
        match res {
            Ok(page) => {
                tracing::debug!(
                    generation,
                    num_comments = page.comments.len(),
                    "loaded root comments"
                );
                self.dispatch(Action::RootLoaded {
                    generation,
                    comments: page.comments,
                    has_more: page.has_more_comments,
                });
                Ok(())
            }
            Err(e) => {
                self.dispatch(Action::RootFailed {
                    generation,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Append the next page of root comments
    ///
    /// Does nothing unless the discussion is ready and more root comments
    /// remain, or if some are already being fetched.
    pub async fn load_more_root(&self) -> Result<(), Error> {
        let token = self.token()?;
        let (generation, page, sort) = {
            let mut state = self.state.lock();
            if !state.is_ready() || !state.pages.can_fetch(&Scope::Root) {
                tracing::debug!(phase = ?state.phase(), "not loading more root comments");
                return Ok(());
            }
            let page = state.pages.state(&Scope::Root).request_page();
            *state = reduce(&state, Action::FetchStarted { scope: Scope::Root });
            (state.generation, page, state.sort)
        };
        match self
            .api
            .fetch_comments(&token, self.config.scope, page, sort)
            .await
        {
            Ok(page) => {
                self.dispatch(Action::MoreRootLoaded {
                    generation,
                    comments: page.comments,
                    has_more: page.has_more_comments,
                });
                Ok(())
            }
            Err(e) => {
                let e = Error::from(e);
                self.dispatch(Action::MoreRootFailed {
                    generation,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Append the next page of replies to `parent`, at whatever depth it is
    ///
    /// A failure only affects `parent`, which stops offering more replies.
    pub async fn load_replies(&self, parent: CommentId) -> Result<(), Error> {
        let token = self.token()?;
        let scope = Scope::Replies(parent);
        let (generation, page, sort) = {
            let mut state = self.state.lock();
            if !state.is_ready() || !state.tree.contains(&parent) {
                tracing::debug!(?parent, phase = ?state.phase(), "not loading replies");
                return Ok(());
            }
            if !state.pages.can_fetch(&scope) {
                tracing::debug!(?parent, "replies already loading or exhausted");
                return Ok(());
            }
            let page = state.pages.state(&scope).request_page();
            *state = reduce(&state, Action::FetchStarted { scope });
            (state.generation, page, state.sort)
        };
        match self.api.fetch_replies(&token, parent, page, sort).await {
            Ok(page) => {
                self.dispatch(Action::RepliesLoaded {
                    generation,
                    parent,
                    replies: page.replies,
                    has_more: page.has_more_replies,
                });
                Ok(())
            }
            Err(e) => {
                let e = Error::from(e);
                self.dispatch(Action::RepliesFailed {
                    generation,
                    parent,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Throw away the whole tree and reload it sorted by `sort`
    pub async fn change_sort(&self, sort: SortMode) -> Result<(), Error> {
        self.token()?;
        self.dispatch(Action::SortChanged { sort });
        self.load_root_with(sort).await
    }

    /// Post a comment, or a reply to `parent`, then reload the discussion
    pub async fn submit_comment(
        &self,
        text: &str,
        parent: Option<CommentId>,
    ) -> Result<(), Error> {
        let comment = NewComment {
            scope: self.config.scope,
            text: String::from(text),
            progress_percentage: self.reader.lock().progress_percentage,
            parent_comment_id: parent,
        };
        comment
            .validate()
            .map_err(|e| Error::Validation(e.to_string()))?;
        if let Some(parent) = parent {
            if !self.state.lock().tree.contains(&parent) {
                return Err(Error::Validation(format!(
                    "replying to comment {parent:?} which is not in the discussion"
                )));
            }
        }
        let token = self.token()?;
        let resp = self.api.submit_comment(&token, comment).await?;
        if resp.message != MSG_COMMENT_ADDED {
            return Err(Error::Server(format!(
                "unexpected answer to comment submission: {:?}",
                resp.message
            )));
        }
        tracing::debug!(?parent, "comment submitted, reloading discussion");
        self.load_root().await
    }

    /// First step of a deletion, `None` if the comment is not in the tree
    pub fn request_delete(&self, comment: CommentId) -> Option<DeleteConfirmation> {
        match self.state.lock().tree.contains(&comment) {
            true => Some(DeleteConfirmation { comment }),
            false => {
                tracing::debug!(comment_id = ?comment, "not deleting a comment absent from tree");
                None
            }
        }
    }

    pub async fn delete_comment(&self, confirmation: DeleteConfirmation) -> Result<(), Error> {
        let comment = confirmation.comment;
        let token = self.token()?;
        let res = match self.api.delete_comment(&token, comment).await {
            Ok(resp) if resp.is_success() => Ok(()),
            Ok(resp) => Err(Error::Server(format!(
                "unexpected answer to comment deletion: {:?}",
                resp.status
            ))),
            Err(e) => Err(Error::from(e)),
        };
        match res {
            Ok(()) => {
                self.dispatch(Action::CommentRemoved { comment });
                Ok(())
            }
            Err(e) => {
                tracing::warn!(comment_id = ?comment, err = %e, "failed deleting comment");
                self.dispatch(Action::DeleteFailed {
                    comment,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }
}
