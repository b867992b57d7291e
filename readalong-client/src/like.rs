use crate::{
    api::{Api, CommentId, Credentials, MSG_COMMENT_LIKED, MSG_COMMENT_UNLIKED},
    Action, Discussion, Error, LikeOutcome,
};

impl<A: Api, C: Credentials> Discussion<A, C> {
    /// Flip the current user's like on `comment`, optimistically
    ///
    /// The tree changes right away. If the server does not confirm, the
    /// change is reverted and a notice is queued, but no error is returned.
    /// Only one toggle per comment may be outstanding at a time.
    pub async fn toggle_like(&self, comment: CommentId) -> Result<LikeOutcome, Error> {
        let token = self.token()?;
        let (generation, now_liked) = {
            let mut state = self.state.lock();
            let was_liked = match state.tree.get(&comment) {
                None => {
                    tracing::debug!(comment_id = ?comment, "not liking a comment absent from tree");
                    return Ok(LikeOutcome::Skipped);
                }
                Some(n) => n.liked_by_current_user,
            };
            if state.likes_in_flight.contains(&comment) {
                return Err(Error::LikeInFlight(comment));
            }
            *state = crate::reduce(&state, Action::LikeToggled { comment });
            (state.generation, !was_liked)
        };
        let expected = match now_liked {
            true => MSG_COMMENT_LIKED,
            false => MSG_COMMENT_UNLIKED,
        };
        let failure = match self.api.toggle_like(&token, comment).await {
            Ok(resp) if resp.message == expected => None,
            Ok(resp) => Some(format!("unexpected answer to like toggle: {:?}", resp.message)),
            Err(e) => Some(Error::from(e).to_string()),
        };
        match failure {
            None => {
                self.dispatch(Action::LikeSettled { comment });
                Ok(LikeOutcome::Confirmed)
            }
            Some(reason) => {
                tracing::warn!(comment_id = ?comment, %reason, "like toggle failed, rolling back");
                self.dispatch(Action::LikeRollback {
                    generation,
                    comment,
                    reason,
                });
                Ok(LikeOutcome::RolledBack)
            }
        }
    }
}
