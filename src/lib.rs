//! Giveaway comment picker: deduplicate commenters by normalized username
//! and draw winners with a cryptographically secure Fisher-Yates shuffle.

pub mod cli;
pub mod comment;
pub mod draw;
pub mod error;
pub mod fetch;
pub mod report;
pub mod trace;

pub use comment::comment_model::{Participant, RawComment, Roster, Timestamp, Winner};
pub use comment::normalize::{EmptyKeyPolicy, normalize, normalize_with};
pub use draw::selector::{select, select_with};
pub use draw::session::PickerSession;
pub use error::PickerError;
