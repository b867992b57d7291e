use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use parking_lot::Mutex;
use readalong_api::{
    Api, AuthToken, Comment, CommentId, CommentPage, Error, MessageResponse, NewComment,
    ReplyPage, ScopeId, SortMode, StatusResponse, Time, UserId, Uuid, MSG_COMMENT_ADDED,
    MSG_COMMENT_LIKED, MSG_COMMENT_UNLIKED,
};

mod seed;
pub use seed::{Seed, SeedComment, SeedUser};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Endpoint {
    FetchComments,
    FetchReplies,
    SubmitComment,
    ToggleLike,
    DeleteComment,
}

/// In-memory discussion server
pub struct MockServer(Mutex<State>);

#[derive(Debug)]
struct State {
    page_size: u32,
    users: BTreeMap<UserId, DbUser>,
    comments: BTreeMap<CommentId, StoredComment>,
    likes: HashSet<(UserId, CommentId)>,
    failures: HashMap<Endpoint, VecDeque<Error>>,
    requests: Vec<Endpoint>,
    clock: Time,
}

#[derive(Debug)]
struct DbUser {
    name: String,
    sessions: HashSet<AuthToken>,
}

#[derive(Clone, Debug)]
struct StoredComment {
    scope: ScopeId,
    author: UserId,
    text: String,
    progress_percentage: u8,
    created_at: Time,
    parent: Option<CommentId>,
    base_likes: u64,
}

impl MockServer {
    pub fn new(page_size: u32) -> MockServer {
        MockServer(Mutex::new(State {
            page_size,
            users: BTreeMap::new(),
            comments: BTreeMap::new(),
            likes: HashSet::new(),
            failures: HashMap::new(),
            requests: Vec::new(),
            clock: Utc
                .timestamp_opt(1_667_556_000, 0)
                .single()
                .unwrap_or_else(Utc::now),
        }))
    }

    pub fn from_seed(page_size: u32, seed: &Seed) -> Result<MockServer, Error> {
        let server = MockServer::new(page_size);
        for u in seed.users.iter() {
            server.add_user(u.id, u.name.clone());
        }
        for c in seed.comments.iter() {
            server.add_comment(seed.scope, c.clone())?;
        }
        Ok(server)
    }

    pub fn add_user(&self, id: UserId, name: String) {
        self.0.lock().users.insert(
            id,
            DbUser {
                name,
                sessions: HashSet::new(),
            },
        );
    }

    /// Create a user and log them in
    pub fn create_user(&self, name: &str) -> (UserId, AuthToken) {
        let id = UserId(Uuid::new_v4());
        let tok = AuthToken(Uuid::new_v4());
        self.0.lock().users.insert(
            id,
            DbUser {
                name: String::from(name),
                sessions: HashSet::from([tok]),
            },
        );
        (id, tok)
    }

    pub fn login(&self, user: UserId) -> Result<AuthToken, Error> {
        let mut s = self.0.lock();
        let u = s.users.get_mut(&user).ok_or(Error::PermissionDenied)?;
        let tok = AuthToken(Uuid::new_v4());
        u.sessions.insert(tok);
        Ok(tok)
    }

    /// Insert a comment as-is, bypassing authentication
    pub fn add_comment(&self, scope: ScopeId, c: SeedComment) -> Result<(), Error> {
        crate::check_comment(&c.text, c.progress_percentage)?;
        let mut s = self.0.lock();
        if !s.users.contains_key(&c.author) {
            return Err(Error::PermissionDenied);
        }
        if let Some(p) = c.parent_id {
            if !s.comments.contains_key(&p) {
                return Err(Error::CommentNotFound(p));
            }
        }
        if s.clock < c.created_at {
            s.clock = c.created_at;
        }
        s.comments.insert(
            c.id,
            StoredComment {
                scope,
                author: c.author,
                text: c.text,
                progress_percentage: c.progress_percentage,
                created_at: c.created_at,
                parent: c.parent_id,
                base_likes: c.like_count,
            },
        );
        Ok(())
    }

    /// Insert a comment written right now, returning its id
    pub fn post(
        &self,
        scope: ScopeId,
        author: UserId,
        text: &str,
        progress_percentage: u8,
        parent_id: Option<CommentId>,
    ) -> Result<CommentId, Error> {
        let id = CommentId(Uuid::new_v4());
        let created_at = self.0.lock().tick();
        self.add_comment(
            scope,
            SeedComment {
                id,
                author,
                text: String::from(text),
                progress_percentage,
                created_at,
                parent_id,
                like_count: 0,
            },
        )?;
        Ok(id)
    }

    /// Make the next call to `endpoint` fail with `err`
    pub fn fail_next(&self, endpoint: Endpoint, err: Error) {
        self.0
            .lock()
            .failures
            .entry(endpoint)
            .or_insert_with(VecDeque::new)
            .push_back(err);
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<Endpoint> {
        self.0.lock().requests.clone()
    }

    pub fn test_num_comments(&self) -> usize {
        self.0.lock().comments.len()
    }
}

fn check_comment(text: &str, progress: u8) -> Result<(), Error> {
    readalong_api::validate_comment_text(text)?;
    readalong_api::validate_progress(progress)
}

impl State {
    /// Record the request, then resolve the user behind `tok`
    fn receive(&mut self, endpoint: Endpoint, tok: &AuthToken) -> Result<UserId, Error> {
        self.requests.push(endpoint);
        if let Some(err) = self.failures.get_mut(&endpoint).and_then(|f| f.pop_front()) {
            tracing::debug!(?endpoint, ?err, "failing request on purpose");
            return Err(err);
        }
        self.users
            .iter()
            .find(|(_, u)| u.sessions.contains(tok))
            .map(|(id, _)| *id)
            .ok_or(Error::PermissionDenied)
    }

    fn tick(&mut self) -> Time {
        self.clock = self.clock + Duration::seconds(1);
        self.clock
    }

    fn render(&self, user: UserId, id: CommentId, c: &StoredComment) -> Comment {
        let likers = self.likes.iter().filter(|(_, l)| *l == id).count() as u64;
        Comment {
            id,
            text: c.text.clone(),
            author_id: c.author,
            author_display_name: self
                .users
                .get(&c.author)
                .map(|u| u.name.clone())
                .unwrap_or_default(),
            progress_percentage: c.progress_percentage,
            like_count: c.base_likes + likers,
            liked_by_current_user: self.likes.contains(&(user, id)),
            created_at: c.created_at,
            parent_id: c.parent,
            replies: Vec::new(),
            total_reply_count: self
                .comments
                .values()
                .filter(|r| r.parent == Some(id))
                .count() as u64,
        }
    }

    /// Page `page` of the comments matching `filter`, and whether more remain
    fn page(
        &self,
        user: UserId,
        page: u32,
        sort: SortMode,
        filter: impl Fn(&StoredComment) -> bool,
    ) -> Result<(Vec<Comment>, bool), Error> {
        if page == 0 {
            return Err(Error::Unknown(String::from("page numbers start at 1")));
        }
        let mut all = self
            .comments
            .iter()
            .filter(|(_, c)| filter(c))
            .map(|(id, c)| self.render(user, *id, c))
            .collect::<Vec<_>>();
        sort.sort(&mut all);
        let size = self.page_size as usize;
        let start = (page as usize - 1) * size;
        let has_more = all.len() > start + size;
        Ok((all.into_iter().skip(start).take(size).collect(), has_more))
    }

    fn descendants(&self, id: CommentId) -> Vec<CommentId> {
        let mut res = Vec::new();
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            res.push(id);
            stack.extend(
                self.comments
                    .iter()
                    .filter(|(_, c)| c.parent == Some(id))
                    .map(|(child, _)| *child),
            );
        }
        res
    }
}

#[async_trait]
impl Api for MockServer {
    async fn fetch_comments(
        &self,
        token: &AuthToken,
        scope: ScopeId,
        page: u32,
        sort: SortMode,
    ) -> Result<CommentPage, Error> {
        let mut s = self.0.lock();
        let user = s.receive(Endpoint::FetchComments, token)?;
        let (comments, has_more_comments) =
            s.page(user, page, sort, |c| c.scope == scope && c.parent.is_none())?;
        Ok(CommentPage {
            comments,
            has_more_comments,
        })
    }

    async fn fetch_replies(
        &self,
        token: &AuthToken,
        parent: CommentId,
        page: u32,
        sort: SortMode,
    ) -> Result<ReplyPage, Error> {
        let mut s = self.0.lock();
        let user = s.receive(Endpoint::FetchReplies, token)?;
        if !s.comments.contains_key(&parent) {
            return Err(Error::CommentNotFound(parent));
        }
        let (replies, has_more_replies) =
            s.page(user, page, sort, |c| c.parent == Some(parent))?;
        Ok(ReplyPage {
            replies,
            has_more_replies,
        })
    }

    async fn submit_comment(
        &self,
        token: &AuthToken,
        comment: NewComment,
    ) -> Result<MessageResponse, Error> {
        let mut s = self.0.lock();
        let user = s.receive(Endpoint::SubmitComment, token)?;
        comment.validate()?;
        if let Some(p) = comment.parent_comment_id {
            match s.comments.get(&p) {
                Some(parent) if parent.scope == comment.scope => (),
                _ => return Err(Error::CommentNotFound(p)),
            }
        }
        let created_at = s.tick();
        let id = CommentId(Uuid::new_v4());
        tracing::debug!(comment_id = ?id, ?user, "adding comment");
        s.comments.insert(
            id,
            StoredComment {
                scope: comment.scope,
                author: user,
                text: comment.text,
                progress_percentage: comment.progress_percentage,
                created_at,
                parent: comment.parent_comment_id,
                base_likes: 0,
            },
        );
        Ok(MessageResponse::new(MSG_COMMENT_ADDED))
    }

    async fn toggle_like(
        &self,
        token: &AuthToken,
        comment: CommentId,
    ) -> Result<MessageResponse, Error> {
        let mut s = self.0.lock();
        let user = s.receive(Endpoint::ToggleLike, token)?;
        if !s.comments.contains_key(&comment) {
            return Err(Error::CommentNotFound(comment));
        }
        if s.likes.remove(&(user, comment)) {
            Ok(MessageResponse::new(MSG_COMMENT_UNLIKED))
        } else {
            s.likes.insert((user, comment));
            Ok(MessageResponse::new(MSG_COMMENT_LIKED))
        }
    }

    async fn delete_comment(
        &self,
        token: &AuthToken,
        comment: CommentId,
    ) -> Result<StatusResponse, Error> {
        let mut s = self.0.lock();
        let user = s.receive(Endpoint::DeleteComment, token)?;
        match s.comments.get(&comment) {
            None => return Err(Error::CommentNotFound(comment)),
            Some(c) if c.author != user => return Err(Error::PermissionDenied),
            Some(_) => (),
        }
        let removed = s.descendants(comment);
        for id in removed.iter() {
            s.comments.remove(id);
        }
        s.likes.retain(|(_, c)| !removed.contains(c));
        tracing::debug!(comment_id = ?comment, num_removed = removed.len(), "deleted comment");
        Ok(StatusResponse::success())
    }
}
