//! Spoiler protection
//!
//! A comment is hidden from readers who have not yet reached the point of the
//! book where it was written, unless they already finished the book. Hidden
//! comments stay in the tree, only their text must not be shown.

use crate::api::{Comment, Reader, ReadingStatus};

pub fn is_hidden(comment: &Comment, reader: &Reader) -> bool {
    reader.reading_status != ReadingStatus::Read
        && reader.progress_percentage < comment.progress_percentage
}

/// Text of `comment`, or `None` if `reader` may not see it yet
pub fn visible_text<'a>(comment: &'a Comment, reader: &Reader) -> Option<&'a str> {
    match is_hidden(comment, reader) {
        true => None,
        false => Some(&comment.text),
    }
}
