use crate::report::report_model::DrawReport;

const RULE_WIDTH: usize = 50;

/// Plain-text export of a draw, the downloadable results file.
pub fn format_text_export(report: &DrawReport) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str(&format!("{}\n", report.title));
    out.push_str(&format!("Date: {}\n", report.date.format("%Y-%m-%d")));
    out.push_str(&format!("Post: {}\n", report.source.as_deref().unwrap_or("N/A")));
    out.push_str(&format!("Total Comments: {}\n", report.total));
    out.push_str(&format!("Unique Participants: {}\n", report.unique_participants));
    out.push_str(&format!("Duplicates Removed: {}\n", report.duplicates_removed));
    out.push_str(&format!("Roster Fingerprint: {}\n", report.roster_fingerprint));

    out.push_str(&format!("\n{}\n\n", rule));
    out.push_str("WINNERS:\n\n");

    for winner in &report.winners {
        out.push_str(&format!("{}. @{}\n", winner.rank, winner.participant.display_username));
        if !winner.participant.text.is_empty() {
            out.push_str(&format!("   Comment: \"{}\"\n", winner.participant.text));
        }
        out.push('\n');
    }

    out.push_str(&format!("\n{}\n\n", rule));
    out.push_str("ALL VALID PARTICIPANTS:\n\n");

    for (i, participant) in report.participants.iter().enumerate() {
        out.push_str(&format!("{}. @{}\n", i + 1, participant.display_username));
    }

    out
}

/// Default export file name for a report date.
pub fn export_file_name(report: &DrawReport, extension: &str) -> String {
    format!("instagram-winner-{}.{}", report.date.format("%Y-%m-%d"), extension)
}
