use rand::CryptoRng;

use crate::comment::comment_model::{RawComment, Roster, Winner};
use crate::comment::normalize::{EmptyKeyPolicy, normalize_with};
use crate::draw::selector::select_with;
use crate::error::PickerError;

/// Caller-held state between "pick" and "pick again".
///
/// A session owns one roster, built once per load. Every draw runs the
/// selector again on that same roster; previous winners stay eligible.
#[derive(Debug, Clone)]
pub struct PickerSession {
    roster: Roster,
    source: Option<String>,
    winners: Vec<Winner>,
    last_count: Option<usize>,
    draws: u32,
}

impl PickerSession {
    /// Normalize `raw` into a fresh session.
    pub fn load(raw: &[RawComment], policy: EmptyKeyPolicy) -> Self {
        Self::from_roster(normalize_with(raw, policy))
    }

    pub fn from_roster(roster: Roster) -> Self {
        Self {
            roster,
            source: None,
            winners: Vec::new(),
            last_count: None,
            draws: 0,
        }
    }

    /// Attach where the comments came from (post URL or file name).
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Winners of the most recent draw.
    pub fn winners(&self) -> &[Winner] {
        &self.winners
    }

    /// Number of draws run on this roster so far.
    pub fn draws(&self) -> u32 {
        self.draws
    }

    pub fn pick(&mut self, count: usize) -> Result<&[Winner], PickerError> {
        self.pick_with(count, &mut rand::rng())
    }

    pub fn pick_with<R: CryptoRng>(
        &mut self,
        count: usize,
        rng: &mut R,
    ) -> Result<&[Winner], PickerError> {
        if count == 0 {
            return Err(PickerError::InvalidCount(count.to_string()));
        }
        if self.roster.is_empty() {
            return Err(PickerError::NoParticipants);
        }

        self.winners = select_with(&self.roster.participants, count, rng);
        self.last_count = Some(count);
        self.draws += 1;
        Ok(&self.winners)
    }

    /// Fresh independent draw with the previous count (1 if none yet).
    pub fn pick_again(&mut self) -> Result<&[Winner], PickerError> {
        self.pick_again_with(&mut rand::rng())
    }

    pub fn pick_again_with<R: CryptoRng>(&mut self, rng: &mut R) -> Result<&[Winner], PickerError> {
        let count = self.last_count.unwrap_or(1);
        self.pick_with(count, rng)
    }
}

/// Validate a user-supplied winner count: an integer >= 1.
pub fn parse_winner_count(input: &str) -> Result<usize, PickerError> {
    let trimmed = input.trim();
    match trimmed.parse::<i64>() {
        Ok(n) if n >= 1 => {
            usize::try_from(n).map_err(|_| PickerError::InvalidCount(trimmed.to_string()))
        }
        _ => Err(PickerError::InvalidCount(trimmed.to_string())),
    }
}
