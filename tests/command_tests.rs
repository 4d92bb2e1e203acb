use comment_picker::cli::commands::{
    CommandContext, ExportFormat, PickOptions, cmd_analyze, cmd_pick, load_session, run_draws,
    write_export,
};
use comment_picker::cli::config::{AppConfig, SourceArgs};
use comment_picker::report::report_model::DrawReport;
use comment_picker::trace::logger::TraceLogger;
use comment_picker::trace::trace::DrawEvent;
use comment_picker::{EmptyKeyPolicy, PickerError, RawComment};

// ============================================================================
// Helper builders
// ============================================================================

fn paste_source(path: &str) -> SourceArgs {
    SourceArgs {
        input: Some(path.to_string()),
        comments: None,
        url: None,
    }
}

fn write_paste(dir: &tempfile::TempDir) -> String {
    let path = dir.path().join("comments.txt");
    std::fs::write(&path, "Alice: hi\nalice: hello\n@Bob : nice!\nCarol:\n").unwrap();
    path.to_str().unwrap().to_string()
}

fn read_lines(path: &std::path::Path) -> Vec<serde_json::Value> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

// ============================================================================
// Draw loop
// ============================================================================

#[test]
fn run_draws_performs_first_pick_plus_redraws() {
    let dir = tempfile::tempdir().unwrap();
    let trace_path = dir.path().join("trace.jsonl");
    let tracer = TraceLogger::new(trace_path.to_str().unwrap());

    let raw: Vec<RawComment> = ["a", "b", "c"].iter().map(|n| RawComment::new(*n, "")).collect();
    let mut session = load_session(&raw, "paste", EmptyKeyPolicy::Drop).unwrap();

    let out = run_draws(&mut session, 2, 2, &tracer).unwrap();
    assert_eq!(session.draws(), 3);
    assert!(out.contains("Draw #1"));
    assert!(out.contains("Draw #3"));

    let events = read_lines(&trace_path);
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|e| e["action"] == "pick"));
    assert_eq!(events[2]["draw"], 3);
    assert_eq!(events[0]["winners"].as_array().unwrap().len(), 2);
    assert_eq!(events[0]["source"], "paste");
}

#[test]
fn run_draws_clamps_oversized_request() {
    let raw = vec![RawComment::new("a", ""), RawComment::new("b", "")];
    let mut session = load_session(&raw, "paste", EmptyKeyPolicy::Drop).unwrap();

    run_draws(&mut session, 10, 0, &TraceLogger::disabled()).unwrap();
    assert_eq!(session.winners().len(), 2);
}

// ============================================================================
// Exports
// ============================================================================

#[test]
fn write_export_text_and_json() {
    let dir = tempfile::tempdir().unwrap();
    let raw = vec![RawComment::new("a", "x"), RawComment::new("b", "y")];
    let mut session = load_session(&raw, "paste", EmptyKeyPolicy::Drop).unwrap();
    session.pick(1).unwrap();
    let date = chrono::NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
    let report = DrawReport::from_session(&session, date);

    let text_path = dir.path().join("out.txt");
    let written = write_export(&report, text_path.to_str().unwrap(), "text").unwrap();
    assert_eq!(written, text_path);
    assert!(std::fs::read_to_string(&text_path).unwrap().contains("WINNERS:"));

    let json_path = dir.path().join("out.json");
    write_export(&report, json_path.to_str().unwrap(), "json").unwrap();
    let parsed: DrawReport =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(parsed.winners, report.winners);
}

#[test]
fn write_export_to_missing_dir_is_io_error() {
    let raw = vec![RawComment::new("a", "")];
    let mut session = load_session(&raw, "paste", EmptyKeyPolicy::Drop).unwrap();
    session.pick(1).unwrap();
    let date = chrono::NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
    let report = DrawReport::from_session(&session, date);

    assert!(matches!(
        write_export(&report, "/no/such/dir/out.txt", "text"),
        Err(PickerError::Io { .. })
    ));
}

#[test]
fn export_format_is_case_insensitive_and_closed() {
    assert_eq!(ExportFormat::parse("json").unwrap(), ExportFormat::Json);
    assert_eq!(ExportFormat::parse(" JSON ").unwrap(), ExportFormat::Json);
    assert_eq!(ExportFormat::parse("Text").unwrap(), ExportFormat::Text);
    assert!(matches!(
        ExportFormat::parse("xml"),
        Err(PickerError::InvalidFormat(f)) if f == "xml"
    ));
}

#[test]
fn unknown_export_format_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let raw = vec![RawComment::new("a", "")];
    let mut session = load_session(&raw, "paste", EmptyKeyPolicy::Drop).unwrap();
    session.pick(1).unwrap();
    let date = chrono::NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
    let report = DrawReport::from_session(&session, date);

    let path = dir.path().join("out.xml");
    let err = write_export(&report, path.to_str().unwrap(), "xml").unwrap_err();
    assert!(matches!(err, PickerError::InvalidFormat(_)));
    assert!(!path.exists());
}

#[test]
fn configured_unknown_format_fails_before_draw() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_paste(&dir);
    let trace_path = dir.path().join("trace.jsonl");
    let export_path = dir.path().join("winners.out");

    let mut config = AppConfig::default();
    config.export.format = "yaml".to_string();
    config.export.output = Some(export_path.to_str().unwrap().to_string());
    let tracer = TraceLogger::new(trace_path.to_str().unwrap());
    let ctx = CommandContext {
        config: &config,
        apify_token: None,
        tracer: &tracer,
    };
    let options = PickOptions {
        count: Some(1),
        redraws: 0,
        export: None,
        format: None,
        empty_keys: None,
    };

    let err = cmd_pick(&paste_source(&input), &options, &ctx).unwrap_err();
    assert!(matches!(err, PickerError::InvalidFormat(_)));
    assert!(!export_path.exists());
    assert_eq!(std::fs::read_to_string(&trace_path).unwrap(), "");
}

// ============================================================================
// End-to-end commands (file sources only)
// ============================================================================

#[test]
fn analyze_logs_one_event() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_paste(&dir);
    let trace_path = dir.path().join("trace.jsonl");
    let tracer = TraceLogger::new(trace_path.to_str().unwrap());
    let config = AppConfig::default();
    let ctx = CommandContext {
        config: &config,
        apify_token: None,
        tracer: &tracer,
    };

    cmd_analyze(&paste_source(&input), None, &ctx).unwrap();

    let events = read_lines(&trace_path);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["action"], "analyze");
    assert_eq!(events[0]["total"], 4);
    assert_eq!(events[0]["unique"], 3);
    assert_eq!(events[0]["duplicates_removed"], 1);
}

#[test]
fn pick_exports_configured_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_paste(&dir);
    let export_path = dir.path().join("winners.json");

    let mut config = AppConfig::default();
    config.export.format = "json".to_string();
    config.export.output = Some(export_path.to_str().unwrap().to_string());
    let tracer = TraceLogger::disabled();
    let ctx = CommandContext {
        config: &config,
        apify_token: None,
        tracer: &tracer,
    };
    let options = PickOptions {
        count: Some(2),
        redraws: 1,
        export: None,
        format: None,
        empty_keys: None,
    };

    cmd_pick(&paste_source(&input), &options, &ctx).unwrap();

    let report: DrawReport =
        serde_json::from_str(&std::fs::read_to_string(&export_path).unwrap()).unwrap();
    assert_eq!(report.winners.len(), 2);
    assert_eq!(report.draw, 2);
    assert_eq!(report.unique_participants, 3);
    assert_eq!(report.source.as_deref(), Some(input.as_str()));
}

#[test]
fn pick_on_blank_paste_is_no_comments() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    std::fs::write(&path, "\n   \n").unwrap();

    let config = AppConfig::default();
    let tracer = TraceLogger::disabled();
    let ctx = CommandContext {
        config: &config,
        apify_token: None,
        tracer: &tracer,
    };
    let options = PickOptions {
        count: None,
        redraws: 0,
        export: None,
        format: None,
        empty_keys: None,
    };

    let err = cmd_pick(&paste_source(path.to_str().unwrap()), &options, &ctx).unwrap_err();
    assert!(matches!(err, PickerError::NoComments));
}

#[test]
fn url_source_without_token_fails_before_fetch() {
    let config = AppConfig::default();
    let tracer = TraceLogger::disabled();
    let ctx = CommandContext {
        config: &config,
        apify_token: None,
        tracer: &tracer,
    };
    let source = SourceArgs {
        input: None,
        comments: None,
        url: Some("https://instagram.com/p/x".into()),
    };

    // Only meaningful when the environment carries no token
    if std::env::var("APIFY_API_TOKEN").is_err() {
        let err = cmd_analyze(&source, None, &ctx).unwrap_err();
        assert!(matches!(err, PickerError::MissingApiToken));
    }
}

// ============================================================================
// Audit events
// ============================================================================

#[test]
fn disabled_logger_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let enabled = TraceLogger::new(dir.path().join("on.jsonl").to_str().unwrap());
    let disabled = TraceLogger::disabled();
    assert!(!disabled.is_enabled());

    let roster = comment_picker::normalize(&[RawComment::new("a", "")]);
    enabled.log(&DrawEvent::analyze(&roster));
    disabled.log(&DrawEvent::analyze(&roster));

    let files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(files, vec!["on.jsonl"]);
    assert_eq!(read_lines(&dir.path().join("on.jsonl")).len(), 1);
}

#[test]
fn unopenable_trace_path_disables_logger() {
    let tracer = TraceLogger::new("/no/such/dir/trace.jsonl");
    assert!(!tracer.is_enabled());
}

#[test]
fn pick_event_records_winner_keys() {
    let raw = vec![RawComment::new("@Alice", ""), RawComment::new("Bob", "")];
    let mut session = load_session(&raw, "paste", EmptyKeyPolicy::Drop).unwrap();
    session.pick(2).unwrap();

    let event = DrawEvent::pick(session.roster(), session.draws(), 2, session.winners());
    let mut keys = event.winners.clone();
    keys.sort();
    assert_eq!(keys, vec!["alice", "bob"]);
    assert_eq!(event.requested, Some(2));
    assert_eq!(event.draw, Some(1));
    assert_eq!(event.roster_fingerprint.len(), 40);
}
