use crate::comment::comment_model::RawComment;
use crate::error::PickerError;

pub mod apify;
pub mod file;

/// External producer of raw comments for a post.
///
/// Implementations either deliver a finite batch or fail before the
/// normalizer ever runs.
pub trait CommentSource {
    fn fetch(&self, post_url: &str) -> Result<Vec<RawComment>, PickerError>;
}
