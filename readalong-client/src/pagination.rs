use crate::api::CommentId;

/// A list that gets paginated on its own
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Scope {
    Root,
    Replies(CommentId),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageState {
    /// Zero-based index of the next page to request
    pub next_page: u32,
    pub has_more: bool,
    pub loading: bool,
}

impl Default for PageState {
    fn default() -> PageState {
        PageState {
            next_page: 0,
            has_more: true,
            loading: false,
        }
    }
}

impl PageState {
    /// Page number to send to the server, which counts from 1
    pub fn request_page(&self) -> u32 {
        self.next_page + 1
    }
}

/// Cursor bookkeeping for every scope of a discussion
///
/// Scopes that were never fetched are absent, and behave as if they had the
/// default state.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Pagination {
    scopes: im::HashMap<Scope, PageState>,
}

impl Pagination {
    pub fn get(&self, scope: &Scope) -> Option<PageState> {
        self.scopes.get(scope).copied()
    }

    pub fn state(&self, scope: &Scope) -> PageState {
        self.get(scope).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn is_loading(&self, scope: &Scope) -> bool {
        self.state(scope).loading
    }

    /// Scopes with a fetch in flight
    pub fn loading(&self) -> impl Iterator<Item = Scope> + '_ {
        self.scopes
            .iter()
            .filter(|(_, s)| s.loading)
            .map(|(scope, _)| *scope)
    }

    /// Whether a new fetch may start for `scope`
    pub fn can_fetch(&self, scope: &Scope) -> bool {
        let s = self.state(scope);
        !s.loading && s.has_more
    }

    pub fn next_offset_for(&self, scope: &Scope, page_size: u32) -> u64 {
        u64::from(self.state(scope).next_page) * u64::from(page_size)
    }

    pub fn begin(&mut self, scope: Scope) {
        self.update(scope, |s| s.loading = true);
    }

    pub fn finish(&mut self, scope: Scope) {
        if self.scopes.contains_key(&scope) {
            self.update(scope, |s| s.loading = false);
        }
    }

    /// Record that a page of `items_returned` items just arrived for `scope`
    pub fn record_page(&mut self, scope: Scope, items_returned: usize, page_size: u32) {
        if items_returned > page_size as usize {
            tracing::warn!(
                ?scope,
                items_returned,
                page_size,
                "server sent a page larger than the configured page size, not fetching further"
            );
        }
        self.update(scope, |s| {
            if s.has_more {
                s.next_page += 1;
            }
            s.has_more = items_returned == page_size as usize;
        });
    }

    /// Stop any further fetch for `scope`
    pub fn mark_exhausted(&mut self, scope: Scope) {
        self.update(scope, |s| s.has_more = false);
    }

    pub fn forget(&mut self, scope: &Scope) {
        self.scopes.remove(scope);
    }

    fn update(&mut self, scope: Scope, f: impl FnOnce(&mut PageState)) {
        let mut s = self.state(&scope);
        f(&mut s);
        self.scopes.insert(scope, s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Uuid;

    #[test]
    fn pages_advance_until_exhausted() {
        let mut p = Pagination::default();
        assert_eq!(p.get(&Scope::Root), None);
        assert!(p.can_fetch(&Scope::Root));
        assert_eq!(p.next_offset_for(&Scope::Root, 10), 0);
        assert_eq!(p.state(&Scope::Root).request_page(), 1);

        p.begin(Scope::Root);
        assert!(!p.can_fetch(&Scope::Root), "duplicate fetch allowed while loading");
        p.finish(Scope::Root);
        p.record_page(Scope::Root, 10, 10);
        assert_eq!(
            p.get(&Scope::Root),
            Some(PageState {
                next_page: 1,
                has_more: true,
                loading: false
            })
        );
        assert_eq!(p.next_offset_for(&Scope::Root, 10), 10);

        p.record_page(Scope::Root, 2, 10);
        assert_eq!(p.state(&Scope::Root).next_page, 2);
        assert!(!p.state(&Scope::Root).has_more);
        assert!(!p.can_fetch(&Scope::Root));

        // exhausted scopes never advance again
        p.record_page(Scope::Root, 10, 10);
        assert_eq!(p.state(&Scope::Root).next_page, 2);
    }

    #[test]
    fn scopes_are_independent() {
        let a = Scope::Replies(CommentId(Uuid::from_u128(1)));
        let b = Scope::Replies(CommentId(Uuid::from_u128(2)));
        let mut p = Pagination::default();
        p.begin(a);
        assert!(p.can_fetch(&b));
        p.mark_exhausted(b);
        assert!(p.is_loading(&a));
        assert!(!p.can_fetch(&b));
        assert_eq!(p.loading().collect::<Vec<_>>(), vec![a]);
        p.forget(&a);
        assert_eq!(p.get(&a), None);
    }

    #[test]
    fn oversized_page_stops_paging() {
        let mut p = Pagination::default();
        p.record_page(Scope::Root, 20, 10);
        assert_eq!(
            p.get(&Scope::Root),
            Some(PageState {
                next_page: 1,
                has_more: false,
                loading: false
            })
        );
        assert!(!p.can_fetch(&Scope::Root));
    }

    #[test]
    fn finishing_unknown_scope_does_not_create_it() {
        let mut p = Pagination::default();
        p.finish(Scope::Root);
        assert!(p.is_empty());
    }
}
