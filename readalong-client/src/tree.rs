use crate::api::{Comment, CommentId, Time, UserId};

/// A comment as held in the tree, without its replies
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Node {
    pub id: CommentId,
    pub text: String,
    pub author_id: UserId,
    pub author_display_name: String,
    pub progress_percentage: u8,
    pub like_count: u64,
    pub liked_by_current_user: bool,
    pub created_at: Time,
    pub parent_id: Option<CommentId>,
    pub total_reply_count: u64,
}

impl Node {
    fn split(c: Comment) -> (Node, Vec<Comment>) {
        let node = Node {
            id: c.id,
            text: c.text,
            author_id: c.author_id,
            author_display_name: c.author_display_name,
            progress_percentage: c.progress_percentage,
            like_count: c.like_count,
            liked_by_current_user: c.liked_by_current_user,
            created_at: c.created_at,
            parent_id: c.parent_id,
            total_reply_count: c.total_reply_count,
        };
        (node, c.replies)
    }

    fn to_comment(&self, replies: Vec<Comment>) -> Comment {
        Comment {
            id: self.id,
            text: self.text.clone(),
            author_id: self.author_id,
            author_display_name: self.author_display_name.clone(),
            progress_percentage: self.progress_percentage,
            like_count: self.like_count,
            liked_by_current_user: self.liked_by_current_user,
            created_at: self.created_at,
            parent_id: self.parent_id,
            replies,
            total_reply_count: self.total_reply_count,
        }
    }
}

/// Snapshot of a discussion, stored as an arena of nodes keyed by id
///
/// Every mutating operation returns a new snapshot and leaves `self` intact.
/// Operations targeting an id that is not in the tree return an identical
/// tree. Ids are unique across the whole tree, and no node ever has more
/// loaded replies than its `total_reply_count`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Tree {
    nodes: im::HashMap<CommentId, Node>,
    roots: im::Vector<CommentId>,
    children: im::HashMap<CommentId, im::Vector<CommentId>>,
}

impl Tree {
    pub fn from_roots(comments: Vec<Comment>) -> Tree {
        Tree::default().append_roots(comments)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &CommentId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: &CommentId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.roots.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn replies_of(&self, id: &CommentId) -> impl Iterator<Item = &Node> {
        self.children
            .get(id)
            .into_iter()
            .flat_map(|ids| ids.iter())
            .filter_map(|id| self.nodes.get(id))
    }

    pub fn num_loaded_replies(&self, id: &CommentId) -> usize {
        self.children.get(id).map(|c| c.len()).unwrap_or(0)
    }

    /// Ids of `id` and all its loaded descendants
    pub fn subtree_ids(&self, id: &CommentId) -> Vec<CommentId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut res = Vec::new();
        let mut stack = vec![*id];
        while let Some(id) = stack.pop() {
            res.push(id);
            if let Some(children) = self.children.get(&id) {
                stack.extend(children.iter().copied());
            }
        }
        res
    }

    /// Rebuild the nested shape of the loaded tree
    pub fn view(&self) -> Vec<Comment> {
        self.roots
            .iter()
            .filter_map(|id| self.subtree(id))
            .collect()
    }

    pub fn subtree(&self, id: &CommentId) -> Option<Comment> {
        let node = self.nodes.get(id)?;
        let replies = self
            .children
            .get(id)
            .into_iter()
            .flat_map(|ids| ids.iter())
            .filter_map(|c| self.subtree(c))
            .collect();
        Some(node.to_comment(replies))
    }

    /// Append comments at the end of the root list, skipping already-known ids
    pub fn append_roots(&self, comments: Vec<Comment>) -> Tree {
        let mut res = self.clone();
        for c in comments {
            let id = c.id;
            if res.insert(c, None) {
                res.roots.push_back(id);
            }
        }
        res
    }

    /// Append `replies` under `parent`, wherever it is in the tree
    pub fn append_replies(&self, parent: &CommentId, replies: Vec<Comment>) -> Tree {
        if !self.contains(parent) {
            tracing::debug!(?parent, "not appending replies to a comment absent from tree");
            return self.clone();
        }
        let mut res = self.clone();
        for r in replies {
            res.attach(*parent, r);
        }
        res
    }

    /// Flip the like of the current user on comment `id`
    pub fn toggle_like(&self, id: &CommentId) -> Tree {
        let mut res = self.clone();
        match res.nodes.get_mut(id) {
            None => tracing::debug!(comment_id = ?id, "not toggling like of a comment absent from tree"),
            Some(n) if n.liked_by_current_user => {
                n.liked_by_current_user = false;
                n.like_count = n.like_count.saturating_sub(1);
            }
            Some(n) => {
                n.liked_by_current_user = true;
                n.like_count += 1;
            }
        }
        res
    }

    /// Remove comment `id` and its whole loaded subtree
    pub fn remove_node(&self, id: &CommentId) -> Tree {
        let parent = match self.nodes.get(id) {
            None => {
                tracing::debug!(comment_id = ?id, "not removing a comment absent from tree");
                return self.clone();
            }
            Some(n) => n.parent_id,
        };
        let mut res = self.clone();
        for c in self.subtree_ids(id) {
            res.nodes.remove(&c);
            res.children.remove(&c);
        }
        if res.roots.iter().any(|c| c == id) {
            res.roots = without(&res.roots, id);
        } else if let Some(p) = parent {
            if let Some(siblings) = res.children.get(&p) {
                let siblings = without(siblings, id);
                res.children.insert(p, siblings);
            }
            if let Some(p) = res.nodes.get_mut(&p) {
                p.total_reply_count = p.total_reply_count.saturating_sub(1);
            }
        }
        res
    }

    /// Insert `c` and its inline replies, returning false if `c.id` was already known
    fn insert(&mut self, c: Comment, parent: Option<CommentId>) -> bool {
        if self.nodes.contains_key(&c.id) {
            tracing::debug!(comment_id = ?c.id, "skipping comment already in tree");
            return false;
        }
        let (mut node, replies) = Node::split(c);
        if parent.is_some() {
            node.parent_id = parent;
        }
        let id = node.id;
        self.nodes.insert(id, node);
        for r in replies {
            self.attach(id, r);
        }
        true
    }

    fn attach(&mut self, parent: CommentId, c: Comment) {
        let id = c.id;
        if !self.insert(c, Some(parent)) {
            return;
        }
        let loaded = match self.children.get_mut(&parent) {
            Some(siblings) => {
                siblings.push_back(id);
                siblings.len()
            }
            None => {
                self.children.insert(parent, im::vector![id]);
                1
            }
        };
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.total_reply_count = p.total_reply_count.max(loaded as u64);
        }
    }
}

fn without(ids: &im::Vector<CommentId>, id: &CommentId) -> im::Vector<CommentId> {
    ids.iter().filter(|c| *c != id).copied().collect()
}
