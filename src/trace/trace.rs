use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::comment::comment_model::{Roster, Winner};
use crate::report::report_model::roster_fingerprint;

/// One audit line: a roster load or a draw.
#[derive(Debug, Serialize)]
pub struct DrawEvent {
    pub timestamp_ms: u128,

    /// "analyze" or "pick"
    pub action: String,

    pub source: Option<String>,

    pub total: usize,
    pub unique: usize,
    pub duplicates_removed: usize,

    pub roster_fingerprint: String,

    pub draw: Option<u32>,
    pub requested: Option<usize>,
    pub winners: Vec<String>,
}

impl DrawEvent {
    pub fn analyze(roster: &Roster) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            action: "analyze".to_string(),
            source: None,
            total: roster.total,
            unique: roster.unique_count,
            duplicates_removed: roster.duplicates_removed,
            roster_fingerprint: roster_fingerprint(roster),
            draw: None,
            requested: None,
            winners: vec![],
        }
    }

    pub fn pick(roster: &Roster, draw: u32, requested: usize, winners: &[Winner]) -> Self {
        let mut event = Self::analyze(roster);
        event.action = "pick".to_string();
        event.draw = Some(draw);
        event.requested = Some(requested);
        event.winners = winners
            .iter()
            .map(|w| w.participant.normalized_key.clone())
            .collect();
        event
    }

    pub fn with_source(mut self, source: Option<&str>) -> Self {
        self.source = source.map(str::to_string);
        self
    }
}
