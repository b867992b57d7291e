use std::{cmp::Ordering, fmt, str::FromStr};

use crate::Comment;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortMode {
    CreatedAsc,
    #[default]
    CreatedDesc,
    PageAsc,
    PageDesc,
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [
        SortMode::CreatedAsc,
        SortMode::CreatedDesc,
        SortMode::PageAsc,
        SortMode::PageDesc,
    ];

    /// Value of the `sort` query parameter understood by the server
    pub fn query_param(&self) -> &'static str {
        match self {
            SortMode::CreatedAsc => "created_asc",
            SortMode::CreatedDesc => "created_desc",
            SortMode::PageAsc => "page_asc",
            SortMode::PageDesc => "page_desc",
        }
    }

    /// Total order over comments for this mode
    ///
    /// Ties on progress are broken by creation date then id, in the same
    /// direction as the primary key.
    pub fn compare(&self, a: &Comment, b: &Comment) -> Ordering {
        let created = (a.created_at, a.id).cmp(&(b.created_at, b.id));
        match self {
            SortMode::CreatedAsc => created,
            SortMode::CreatedDesc => created.reverse(),
            SortMode::PageAsc => a
                .progress_percentage
                .cmp(&b.progress_percentage)
                .then(created),
            SortMode::PageDesc => b
                .progress_percentage
                .cmp(&a.progress_percentage)
                .then(created.reverse()),
        }
    }

    pub fn sort(&self, comments: &mut [Comment]) {
        comments.sort_unstable_by(|a, b| self.compare(a, b))
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_param())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<SortMode, String> {
        SortMode::ALL
            .into_iter()
            .find(|m| m.query_param() == s)
            .ok_or_else(|| format!("unknown sort mode {s:?}, expected one of created_asc, created_desc, page_asc, page_desc"))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::{CommentId, UserId};

    fn comment(n: u128, minute: u32, progress: u8) -> Comment {
        Comment {
            id: CommentId(Uuid::from_u128(n)),
            text: format!("comment {n}"),
            author_id: UserId::stub(),
            author_display_name: String::from("stub"),
            progress_percentage: progress,
            like_count: 0,
            liked_by_current_user: false,
            created_at: Utc.with_ymd_and_hms(2022, 11, 4, 10, minute, 0).unwrap(),
            parent_id: None,
            replies: Vec::new(),
            total_reply_count: 0,
        }
    }

    fn ids(comments: &[Comment]) -> Vec<u128> {
        comments.iter().map(|c| c.id.0.as_u128()).collect()
    }

    #[test]
    fn each_mode_orders_comments() {
        let base = vec![comment(1, 3, 50), comment(2, 1, 90), comment(3, 2, 10)];

        let mut c = base.clone();
        SortMode::CreatedAsc.sort(&mut c);
        assert_eq!(ids(&c), vec![2, 3, 1]);

        let mut c = base.clone();
        SortMode::CreatedDesc.sort(&mut c);
        assert_eq!(ids(&c), vec![1, 3, 2]);

        let mut c = base.clone();
        SortMode::PageAsc.sort(&mut c);
        assert_eq!(ids(&c), vec![3, 1, 2]);

        let mut c = base;
        SortMode::PageDesc.sort(&mut c);
        assert_eq!(ids(&c), vec![2, 1, 3]);
    }

    #[test]
    fn progress_ties_fall_back_to_creation_date() {
        let base = vec![comment(1, 5, 30), comment(2, 1, 30)];
        let mut c = base.clone();
        SortMode::PageAsc.sort(&mut c);
        assert_eq!(ids(&c), vec![2, 1]);
        let mut c = base;
        SortMode::PageDesc.sort(&mut c);
        assert_eq!(ids(&c), vec![1, 2]);
    }

    #[test]
    fn query_param_parses_back() {
        for m in SortMode::ALL {
            assert_eq!(m.query_param().parse::<SortMode>(), Ok(m));
        }
        assert!("newest".parse::<SortMode>().is_err());
    }
}
