use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::comment::comment_model::{Participant, Roster, Winner};
use crate::draw::session::PickerSession;
use crate::error::PickerError;

pub const REPORT_TITLE: &str = "Instagram Comment Picker Results";

// ============================================================================
// Draw report — one export of a session's latest draw
// ============================================================================

/// Snapshot of a session's roster and most recent draw.
///
/// Consumed by the text exporter and serialized as-is for JSON export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawReport {
    pub title: String,

    pub date: NaiveDate,

    /// Post URL or input file the comments came from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    pub total: usize,
    pub unique_participants: usize,
    pub duplicates_removed: usize,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub skipped: usize,

    /// SHA-1 over the roster's normalized keys, see `roster_fingerprint`
    pub roster_fingerprint: String,

    /// How many draws the session had run when this report was taken
    pub draw: u32,

    pub winners: Vec<Winner>,
    pub participants: Vec<Participant>,
}

impl DrawReport {
    pub fn from_session(session: &PickerSession, date: NaiveDate) -> Self {
        let roster = session.roster();
        Self {
            title: REPORT_TITLE.to_string(),
            date,
            source: session.source().map(str::to_string),
            total: roster.total,
            unique_participants: roster.unique_count,
            duplicates_removed: roster.duplicates_removed,
            skipped: roster.skipped,
            roster_fingerprint: roster_fingerprint(roster),
            draw: session.draws(),
            winners: session.winners().to_vec(),
            participants: roster.participants.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, PickerError> {
        serde_json::to_string_pretty(self).map_err(|e| PickerError::json("serializing report", e))
    }
}

/// Fingerprint of the entrant list: SHA-1 hex of the normalized keys in
/// roster order, joined by newlines. Two rosters share a fingerprint iff
/// they hold the same entrants in the same order.
pub fn roster_fingerprint(roster: &Roster) -> String {
    let mut hasher = Sha1::new();
    for (i, participant) in roster.participants.iter().enumerate() {
        if i > 0 {
            hasher.update(b"\n");
        }
        hasher.update(participant.normalized_key.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}
