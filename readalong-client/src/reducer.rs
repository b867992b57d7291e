use crate::{
    api::{Comment, CommentId, SortMode},
    Pagination, Scope, Tree,
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    Idle,
    LoadingRoot,
    Ready,
    LoadingMore(Scope),
    Error(String),
}

/// Non-blocking message for the user, queued until the view collects it
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Notice {
    LikeReverted { comment: CommentId, reason: String },
    LoadFailed { scope: Scope, message: String },
    DeleteFailed { comment: CommentId, message: String },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiscussionState {
    pub page_size: u32,
    pub sort: SortMode,

    /// Bumped each time the tree is invalidated, responses tagged with an
    /// older generation get dropped
    pub generation: u64,

    /// Never `LoadingMore`, see `phase()`
    pub status: Phase,

    pub tree: Tree,
    pub pages: Pagination,
    pub likes_in_flight: im::HashSet<CommentId>,
    pub notices: im::Vector<Notice>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Action {
    RootRequested {
        sort: SortMode,
    },
    RootLoaded {
        generation: u64,
        comments: Vec<Comment>,
        has_more: bool,
    },
    RootFailed {
        generation: u64,
        message: String,
    },
    FetchStarted {
        scope: Scope,
    },
    MoreRootLoaded {
        generation: u64,
        comments: Vec<Comment>,
        has_more: bool,
    },
    MoreRootFailed {
        generation: u64,
        message: String,
    },
    RepliesLoaded {
        generation: u64,
        parent: CommentId,
        replies: Vec<Comment>,
        has_more: bool,
    },
    RepliesFailed {
        generation: u64,
        parent: CommentId,
        message: String,
    },
    LikeToggled {
        comment: CommentId,
    },
    LikeSettled {
        comment: CommentId,
    },
    LikeRollback {
        generation: u64,
        comment: CommentId,
        reason: String,
    },
    CommentRemoved {
        comment: CommentId,
    },
    DeleteFailed {
        comment: CommentId,
        message: String,
    },
    SortChanged {
        sort: SortMode,
    },
    NoticesCleared,
}

impl DiscussionState {
    pub fn new(page_size: u32, sort: SortMode) -> DiscussionState {
        DiscussionState {
            page_size,
            sort,
            generation: 0,
            status: Phase::Idle,
            tree: Tree::default(),
            pages: Pagination::default(),
            likes_in_flight: im::HashSet::new(),
            notices: im::Vector::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.status != Phase::Ready {
            return self.status.clone();
        }
        if self.pages.is_loading(&Scope::Root) {
            return Phase::LoadingMore(Scope::Root);
        }
        match self.pages.loading().next() {
            Some(scope) => Phase::LoadingMore(scope),
            None => Phase::Ready,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == Phase::Ready
    }

    fn is_stale(&self, generation: u64, what: &str) -> bool {
        let stale = generation != self.generation;
        if stale {
            tracing::debug!(
                generation,
                current_generation = self.generation,
                "dropping stale {what}"
            );
        }
        stale
    }
}

/// Compute the state resulting from applying `action` to `state`
pub fn reduce(state: &DiscussionState, action: Action) -> DiscussionState {
    let mut s = state.clone();
    match action {
        Action::RootRequested { sort } => {
            s.generation += 1;
            s.sort = sort;
            s.status = Phase::LoadingRoot;
        }
        Action::RootLoaded {
            generation,
            comments,
            has_more,
        } => {
            if s.is_stale(generation, "root page") {
                return s;
            }
            let items = comments.len();
            s.tree = Tree::from_roots(comments);
            s.pages = Pagination::default();
            record(&mut s, Scope::Root, items, has_more);
            s.status = Phase::Ready;
        }
        Action::RootFailed {
            generation,
            message,
        } => {
            if s.is_stale(generation, "root failure") {
                return s;
            }
            tracing::warn!(generation, %message, "failed loading discussion");
            s.status = Phase::Error(message);
        }
        Action::FetchStarted { scope } => s.pages.begin(scope),
        Action::MoreRootLoaded {
            generation,
            comments,
            has_more,
        } => {
            if s.is_stale(generation, "root page") {
                return s;
            }
            let items = comments.len();
            s.tree = s.tree.append_roots(comments);
            s.pages.finish(Scope::Root);
            record(&mut s, Scope::Root, items, has_more);
        }
        Action::MoreRootFailed {
            generation,
            message,
        } => {
            if s.is_stale(generation, "root failure") {
                return s;
            }
            tracing::warn!(generation, %message, "failed loading more comments");
            s.pages.finish(Scope::Root);
            s.notices.push_back(Notice::LoadFailed {
                scope: Scope::Root,
                message,
            });
        }
        Action::RepliesLoaded {
            generation,
            parent,
            replies,
            has_more,
        } => {
            if s.is_stale(generation, "reply page") {
                return s;
            }
            let scope = Scope::Replies(parent);
            if !s.tree.contains(&parent) {
                tracing::debug!(?parent, "dropping replies to a comment that left the tree");
                s.pages.forget(&scope);
                return s;
            }
            let items = replies.len();
            s.tree = s.tree.append_replies(&parent, replies);
            s.pages.finish(scope);
            record(&mut s, scope, items, has_more);
        }
        Action::RepliesFailed {
            generation,
            parent,
            message,
        } => {
            if s.is_stale(generation, "reply failure") {
                return s;
            }
            tracing::warn!(?parent, %message, "failed loading replies");
            let scope = Scope::Replies(parent);
            s.pages.finish(scope);
            s.pages.mark_exhausted(scope);
            s.notices.push_back(Notice::LoadFailed { scope, message });
        }
        Action::LikeToggled { comment } => {
            if s.tree.contains(&comment) {
                s.tree = s.tree.toggle_like(&comment);
                s.likes_in_flight.insert(comment);
            }
        }
        Action::LikeSettled { comment } => {
            s.likes_in_flight.remove(&comment);
        }
        Action::LikeRollback {
            generation,
            comment,
            reason,
        } => {
            s.likes_in_flight.remove(&comment);
            // A reloaded tree already reflects what the server has
            if !s.is_stale(generation, "like rollback") {
                s.tree = s.tree.toggle_like(&comment);
            }
            s.notices
                .push_back(Notice::LikeReverted { comment, reason });
        }
        Action::CommentRemoved { comment } => {
            for id in s.tree.subtree_ids(&comment) {
                s.pages.forget(&Scope::Replies(id));
            }
            s.tree = s.tree.remove_node(&comment);
        }
        Action::DeleteFailed { comment, message } => {
            s.notices
                .push_back(Notice::DeleteFailed { comment, message });
        }
        Action::SortChanged { sort } => {
            s.generation += 1;
            s.sort = sort;
            s.status = Phase::Idle;
            s.tree = Tree::default();
            s.pages = Pagination::default();
        }
        Action::NoticesCleared => s.notices = im::Vector::new(),
    }
    s
}

fn record(s: &mut DiscussionState, scope: Scope, items: usize, server_has_more: bool) {
    s.pages.record_page(scope, items, s.page_size);
    if !server_has_more {
        s.pages.mark_exhausted(scope);
    }
}
