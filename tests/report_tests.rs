use chrono::NaiveDate;
use comment_picker::report::console::{format_draw, format_participants, format_stats, rank_label};
use comment_picker::report::report_model::{DrawReport, roster_fingerprint};
use comment_picker::report::text::{export_file_name, format_text_export};
use comment_picker::{EmptyKeyPolicy, PickerSession, RawComment, normalize};
use rand::SeedableRng;
use rand::rngs::StdRng;

// ============================================================================
// Helper builders
// ============================================================================

fn drawn_session() -> PickerSession {
    let raw = vec![
        RawComment::new("Alice", "pick me"),
        RawComment::new("alice", "again"),
        RawComment::new("@Bob", ""),
        RawComment::new("Carol", "yes!"),
    ];
    let mut session =
        PickerSession::load(&raw, EmptyKeyPolicy::Drop).with_source("https://instagram.com/p/abc");
    session.pick_with(2, &mut StdRng::seed_from_u64(9)).unwrap();
    session
}

fn report_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
}

// ============================================================================
// Console
// ============================================================================

#[test]
fn rank_labels_cover_podium_then_numbers() {
    assert_eq!(rank_label(1), "1st Place");
    assert_eq!(rank_label(3), "3rd Place");
    assert_eq!(rank_label(5), "5th Place");
    assert_eq!(rank_label(6), "Winner #6");
}

#[test]
fn stats_show_all_counts() {
    let session = drawn_session();
    let out = format_stats(session.roster());
    assert!(out.contains("Total comments:      4"));
    assert!(out.contains("Unique participants: 3"));
    assert!(out.contains("Duplicates removed:  1"));
    assert!(out.contains("Valid entries:       3"));
    assert!(!out.contains("Skipped"));
}

#[test]
fn stats_mention_skipped_records() {
    let roster = normalize(&[RawComment::new("@", ""), RawComment::new("x", "")]);
    assert!(format_stats(&roster).contains("Skipped (no username): 1"));
}

#[test]
fn participants_listed_in_entry_order() {
    let session = drawn_session();
    let out = format_participants(session.roster());
    assert!(out.contains("Participants (3):"));
    let alice = out.find("1. @Alice").unwrap();
    let bob = out.find("2. @Bob").unwrap();
    let carol = out.find("3. @Carol").unwrap();
    assert!(alice < bob && bob < carol);
}

#[test]
fn draw_lists_winners_with_comments() {
    let session = drawn_session();
    let out = format_draw(session.draws(), session.winners());

    assert!(out.contains("=== Draw #1: 2 winner(s) ==="));
    assert!(out.contains("1st Place"));
    assert!(out.contains("2nd Place"));
    for w in session.winners() {
        assert!(out.contains(&format!("@{} (entry #{})", w.participant.display_username, w.entry)));
        if !w.participant.text.is_empty() {
            assert!(out.contains(&format!("\"{}\"", w.participant.text)));
        }
    }
}

// ============================================================================
// Report model and exports
// ============================================================================

#[test]
fn report_snapshots_session() {
    let session = drawn_session();
    let report = DrawReport::from_session(&session, report_date());

    assert_eq!(report.source.as_deref(), Some("https://instagram.com/p/abc"));
    assert_eq!(report.total, 4);
    assert_eq!(report.unique_participants, 3);
    assert_eq!(report.duplicates_removed, 1);
    assert_eq!(report.draw, 1);
    assert_eq!(report.winners, session.winners());
    assert_eq!(report.participants.len(), 3);
    assert_eq!(report.roster_fingerprint, roster_fingerprint(session.roster()));
}

#[test]
fn fingerprint_is_sha1_of_keys() {
    let roster = normalize(&[RawComment::new("Alice", ""), RawComment::new("@BOB", "")]);
    let fp = roster_fingerprint(&roster);
    assert_eq!(fp.len(), 40);

    let same = normalize(&[RawComment::new("alice", "x"), RawComment::new("bob", "y")]);
    assert_eq!(roster_fingerprint(&same), fp);

    let reordered = normalize(&[RawComment::new("bob", ""), RawComment::new("alice", "")]);
    assert_ne!(roster_fingerprint(&reordered), fp);
}

#[test]
fn empty_roster_fingerprint_is_sha1_of_nothing() {
    let roster = normalize(&[]);
    assert_eq!(
        roster_fingerprint(&roster),
        "da39a3ee5e6b4b0d3255bfef95601890afd80709"
    );
}

#[test]
fn text_export_has_header_winners_and_participants() {
    let session = drawn_session();
    let report = DrawReport::from_session(&session, report_date());
    let text = format_text_export(&report);

    assert!(text.starts_with("Instagram Comment Picker Results\nDate: 2025-03-07\n"));
    assert!(text.contains("Post: https://instagram.com/p/abc\n"));
    assert!(text.contains("Total Comments: 4\n"));
    assert!(text.contains("Unique Participants: 3\n"));
    assert!(text.contains("Duplicates Removed: 1\n"));
    assert!(text.contains(&format!("Roster Fingerprint: {}\n", report.roster_fingerprint)));
    assert!(text.contains(&"=".repeat(50)));
    assert!(text.contains("WINNERS:\n\n1. @"));
    assert!(text.contains("ALL VALID PARTICIPANTS:\n\n1. @Alice\n2. @Bob\n3. @Carol\n"));
}

#[test]
fn text_export_without_source_says_na() {
    let raw = vec![RawComment::new("solo", "")];
    let mut session = PickerSession::load(&raw, EmptyKeyPolicy::Drop);
    session.pick(1).unwrap();
    let text = format_text_export(&DrawReport::from_session(&session, report_date()));

    assert!(text.contains("Post: N/A\n"));
    assert!(text.contains("1. @solo\n\n"));
    assert!(!text.contains("Comment:"));
}

#[test]
fn json_export_round_trips_key_fields() {
    let session = drawn_session();
    let report = DrawReport::from_session(&session, report_date());
    let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(value["date"], "2025-03-07");
    assert_eq!(value["unique_participants"], 3);
    assert_eq!(value["winners"].as_array().unwrap().len(), 2);
    assert_eq!(value["winners"][0]["rank"], 1);
    assert!(value.get("skipped").is_none());
}

#[test]
fn export_file_name_is_dated() {
    let session = drawn_session();
    let report = DrawReport::from_session(&session, report_date());
    assert_eq!(export_file_name(&report, "txt"), "instagram-winner-2025-03-07.txt");
}
