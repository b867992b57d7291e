#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    future::Future,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use futures::channel::oneshot;
use readalong_client::{
    api::{
        Api, AuthToken, Comment, CommentId, CommentPage, Credentials, Error, MessageResponse,
        NewComment, Reader, ReadingStatus, ReplyPage, ScopeId, SortMode, StatusResponse, UserId,
    },
    Discussion, DiscussionConfig,
};
use readalong_mock_server::{Endpoint, MockServer};

pub const PAGE_SIZE: u32 = 10;

pub fn run<F: Future<Output = ()>>(f: F) {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed initializing tokio runtime")
        .block_on(f)
}

/// Credentials that can be revoked mid-test
pub struct Session(Mutex<Option<AuthToken>>);

impl Session {
    pub fn new(tok: AuthToken) -> Session {
        Session(Mutex::new(Some(tok)))
    }

    pub fn logout(&self) {
        *self.0.lock().unwrap() = None;
    }
}

impl Credentials for Session {
    fn bearer(&self) -> Option<AuthToken> {
        *self.0.lock().unwrap()
    }
}

/// Mock server wrapper that can hold requests back, or answer likes with
/// an unexpected message
pub struct Scripted {
    pub server: Arc<MockServer>,
    gates: Mutex<HashMap<Endpoint, oneshot::Receiver<()>>>,
    like_message: Mutex<Option<String>>,
}

impl Scripted {
    pub fn new(server: Arc<MockServer>) -> Scripted {
        Scripted {
            server,
            gates: Mutex::new(HashMap::new()),
            like_message: Mutex::new(None),
        }
    }

    /// Hold back the next request to `endpoint` until the returned sender fires
    pub fn gate(&self, endpoint: Endpoint) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(endpoint, rx);
        tx
    }

    pub fn answer_likes_with(&self, message: &str) {
        *self.like_message.lock().unwrap() = Some(String::from(message));
    }

    async fn wait(&self, endpoint: Endpoint) {
        let gate = self.gates.lock().unwrap().remove(&endpoint);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }
}

#[async_trait]
impl Api for Scripted {
    async fn fetch_comments(
        &self,
        token: &AuthToken,
        scope: ScopeId,
        page: u32,
        sort: SortMode,
    ) -> Result<CommentPage, Error> {
        self.wait(Endpoint::FetchComments).await;
        self.server.fetch_comments(token, scope, page, sort).await
    }

    async fn fetch_replies(
        &self,
        token: &AuthToken,
        parent: CommentId,
        page: u32,
        sort: SortMode,
    ) -> Result<ReplyPage, Error> {
        self.wait(Endpoint::FetchReplies).await;
        self.server.fetch_replies(token, parent, page, sort).await
    }

    async fn submit_comment(
        &self,
        token: &AuthToken,
        comment: NewComment,
    ) -> Result<MessageResponse, Error> {
        self.wait(Endpoint::SubmitComment).await;
        self.server.submit_comment(token, comment).await
    }

    async fn toggle_like(
        &self,
        token: &AuthToken,
        comment: CommentId,
    ) -> Result<MessageResponse, Error> {
        self.wait(Endpoint::ToggleLike).await;
        let resp = self.server.toggle_like(token, comment).await?;
        let forced = self.like_message.lock().unwrap().clone();
        Ok(match forced {
            Some(message) => MessageResponse { message },
            None => resp,
        })
    }

    async fn delete_comment(
        &self,
        token: &AuthToken,
        comment: CommentId,
    ) -> Result<StatusResponse, Error> {
        self.wait(Endpoint::DeleteComment).await;
        self.server.delete_comment(token, comment).await
    }
}

pub struct Fixture {
    pub server: Arc<MockServer>,
    pub user: UserId,
    pub token: AuthToken,
    pub scope: ScopeId,
}

impl Fixture {
    /// Server with `roots` root comments, at increasing progress
    pub fn new(roots: usize) -> Fixture {
        Fixture::with_page_size(roots, PAGE_SIZE)
    }

    pub fn with_page_size(roots: usize, page_size: u32) -> Fixture {
        let server = Arc::new(MockServer::new(page_size));
        let (user, token) = server.create_user("ada");
        let scope = ScopeId::stub();
        for i in 0..roots {
            server
                .post(scope, user, &format!("root {i}"), ((i * 37) % 101) as u8, None)
                .expect("posting root comment");
        }
        Fixture {
            server,
            user,
            token,
            scope,
        }
    }

    pub fn reply(&self, parent: CommentId, text: &str) -> CommentId {
        self.server
            .post(self.scope, self.user, text, 0, Some(parent))
            .expect("posting reply")
    }

    pub fn config(&self, sort: SortMode) -> DiscussionConfig {
        DiscussionConfig::new(self.scope)
            .with_page_size(PAGE_SIZE)
            .with_sort(sort)
    }

    pub fn discussion(&self, sort: SortMode) -> Discussion<Scripted, Session> {
        Discussion::new(
            Scripted::new(self.server.clone()),
            Session::new(self.token),
            self.config(sort),
            Reader::new(ReadingStatus::CurrentlyReading, 50),
        )
    }

    pub fn requests_to(&self, endpoint: Endpoint) -> usize {
        self.server
            .requests()
            .into_iter()
            .filter(|e| *e == endpoint)
            .count()
    }
}

pub fn texts(comments: &[Comment]) -> Vec<String> {
    comments.iter().map(|c| c.text.clone()).collect()
}

pub fn assert_unique_ids(comments: &[Comment]) {
    fn walk(c: &Comment, seen: &mut HashSet<CommentId>) {
        assert!(seen.insert(c.id), "id {:?} appears twice", c.id);
        for r in c.replies.iter() {
            walk(r, seen);
        }
    }
    let mut seen = HashSet::new();
    for c in comments {
        walk(c, &mut seen);
    }
}
