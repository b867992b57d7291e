mod config;
pub use config::{DiscussionConfig, DEFAULT_PAGE_SIZE};

mod discussion;
pub use discussion::{DeleteConfirmation, Discussion, LikeOutcome};

mod error;
pub use error::Error;

mod like;

mod pagination;
pub use pagination::{PageState, Pagination, Scope};

mod reducer;
pub use reducer::{reduce, Action, DiscussionState, Notice, Phase};

mod tree;
pub use tree::{Node, Tree};

pub mod visibility;

pub mod api {
    pub use readalong_api::*;
}
