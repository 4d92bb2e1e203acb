use crate::comment::comment_model::{Roster, Winner};

// ============================================================================
// Console reporter — formatted terminal output
// ============================================================================

const PLACES: [&str; 5] = ["1st Place", "2nd Place", "3rd Place", "4th Place", "5th Place"];

/// Podium label for a 1-based rank; past 5th it becomes `Winner #n`.
pub fn rank_label(rank: usize) -> String {
    match rank {
        1..=5 => PLACES[rank - 1].to_string(),
        _ => format!("Winner #{}", rank),
    }
}

/// Roster statistics block.
///
/// ```text
/// === Comments analyzed ===
/// Total comments:      4
/// Unique participants: 3
/// Duplicates removed:  1
/// Valid entries:       3
/// ```
pub fn format_stats(roster: &Roster) -> String {
    let mut out = String::new();

    out.push_str("=== Comments analyzed ===\n");
    out.push_str(&format!("Total comments:      {}\n", roster.total));
    out.push_str(&format!("Unique participants: {}\n", roster.unique_count));
    out.push_str(&format!("Duplicates removed:  {}\n", roster.duplicates_removed));
    out.push_str(&format!("Valid entries:       {}\n", roster.unique_count));

    if roster.skipped > 0 {
        out.push_str(&format!("Skipped (no username): {}\n", roster.skipped));
    }

    out
}

pub fn format_participants(roster: &Roster) -> String {
    let mut out = format!("\nParticipants ({}):\n", roster.len());
    for (i, participant) in roster.participants.iter().enumerate() {
        out.push_str(&format!("  {}. @{}\n", i + 1, participant.display_username));
    }
    out
}

/// One draw, winners in rank order with their comment if any.
pub fn format_draw(draw: u32, winners: &[Winner]) -> String {
    let mut out = format!("\n=== Draw #{}: {} winner(s) ===\n", draw, winners.len());

    for winner in winners {
        out.push_str(&format!(
            "{:<10} @{} (entry #{})\n",
            rank_label(winner.rank),
            winner.participant.display_username,
            winner.entry
        ));
        if !winner.participant.text.is_empty() {
            out.push_str(&format!("           \"{}\"\n", winner.participant.text));
        }
    }

    out
}
