use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============================================================================
// Raw input — producer-controlled, every field optional
// ============================================================================

/// Comment timestamp as delivered by the source.
///
/// Pasted text has none, JSON files usually carry epoch millis (sometimes
/// written as floats), and the Apify scraper returns ISO-8601 strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    Float(f64),
    Text(String),
}

/// An unprocessed comment record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawComment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,

    /// Numeric ids are kept in their decimal string form
    #[serde(
        default,
        deserialize_with = "id_from_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "invalid comment id {other}, expected a string or a number"
        ))),
    }
}

impl RawComment {
    pub fn new(username: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            text: Some(text.into()),
            timestamp: None,
            id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Record id, or the record's position in its batch when absent.
    pub fn id_or_index(&self, index: usize) -> String {
        self.id.clone().unwrap_or_else(|| index.to_string())
    }
}

// ============================================================================
// Deduplicated entrants and draw results
// ============================================================================

/// A deduplicated entrant, keyed by normalized username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Username as first seen, `@`/whitespace stripped at the edges only
    pub display_username: String,

    /// Identity key: lowercase, no `@`, trimmed
    pub normalized_key: String,

    /// First-seen comment body for this key
    pub text: String,

    /// First-seen record id (or its positional index)
    pub id: String,
}

/// A participant picked by a draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    /// 1-based selection order
    pub rank: usize,

    /// 1-based position of the participant in the roster
    pub entry: usize,

    pub participant: Participant,
}

/// Normalizer output: the participant sequence plus aggregate counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub participants: Vec<Participant>,

    /// Records taken into account (see `EmptyKeyPolicy`)
    pub total: usize,

    pub unique_count: usize,

    pub duplicates_removed: usize,

    /// Empty-username records left out of `total`
    pub skipped: usize,
}

impl Roster {
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }
}
