use crate::api::{ScopeId, SortMode};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionConfig {
    pub scope: ScopeId,

    /// Must match the page size the server uses
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Sort mode used for the first load
    #[serde(default)]
    pub sort: SortMode,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl DiscussionConfig {
    pub fn new(scope: ScopeId) -> DiscussionConfig {
        DiscussionConfig {
            scope,
            page_size: DEFAULT_PAGE_SIZE,
            sort: SortMode::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> DiscussionConfig {
        self.page_size = page_size;
        self
    }

    pub fn with_sort(mut self, sort: SortMode) -> DiscussionConfig {
        self.sort = sort;
        self
    }
}
