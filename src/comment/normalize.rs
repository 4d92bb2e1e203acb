use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::comment::comment_model::{Participant, RawComment, Roster};

/// How records whose username is empty after normalization are counted.
///
/// They are never participants either way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyKeyPolicy {
    /// Left out of `total`, reported in `skipped`
    #[default]
    Drop,
    /// Counted in `total` and in `duplicates_removed`
    CountAsDuplicate,
}

impl FromStr for EmptyKeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" => Ok(EmptyKeyPolicy::Drop),
            "duplicate" | "count-as-duplicate" => Ok(EmptyKeyPolicy::CountAsDuplicate),
            other => Err(format!(
                "unknown empty-key policy '{}' (expected 'drop' or 'duplicate')",
                other
            )),
        }
    }
}

/// Identity key for a username: every `@` removed, trimmed, lowercased.
pub fn normalized_key(username: &str) -> String {
    username.replace('@', "").trim().to_lowercase()
}

/// Display form: original casing, `@` and whitespace stripped at the edges.
pub fn display_username(username: &str) -> String {
    username
        .trim_matches(|c: char| c == '@' || c.is_whitespace())
        .to_string()
}

pub fn normalize(raw: &[RawComment]) -> Roster {
    normalize_with(raw, EmptyKeyPolicy::default())
}

/// Collapse raw comments into one participant per normalized username,
/// keeping first-occurrence order. Later records with a seen key are
/// dropped without touching the first one.
pub fn normalize_with(raw: &[RawComment], policy: EmptyKeyPolicy) -> Roster {
    let mut seen = HashSet::new();
    let mut participants = Vec::new();
    let mut skipped = 0;

    for (index, comment) in raw.iter().enumerate() {
        let username = comment.username.as_deref().unwrap_or("");
        let key = normalized_key(username);

        if key.is_empty() {
            skipped += 1;
            continue;
        }

        if seen.insert(key.clone()) {
            participants.push(Participant {
                display_username: display_username(username),
                normalized_key: key,
                text: comment.text.clone().unwrap_or_default(),
                id: comment.id_or_index(index),
            });
        }
    }

    let (total, skipped) = match policy {
        EmptyKeyPolicy::Drop => (raw.len() - skipped, skipped),
        EmptyKeyPolicy::CountAsDuplicate => (raw.len(), 0),
    };
    let unique_count = participants.len();

    Roster {
        participants,
        total,
        unique_count,
        duplicates_removed: total - unique_count,
        skipped,
    }
}
