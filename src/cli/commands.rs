use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::cli::config::{AppConfig, SourceArgs, build_apify_settings};
use crate::comment::comment_model::RawComment;
use crate::comment::normalize::EmptyKeyPolicy;
use crate::draw::session::PickerSession;
use crate::error::PickerError;
use crate::fetch::CommentSource;
use crate::fetch::apify::ApifyClient;
use crate::fetch::file::{read_comments_json, read_pasted, save_comments};
use crate::report::console::{format_draw, format_participants, format_stats};
use crate::report::report_model::DrawReport;
use crate::report::text::{export_file_name, format_text_export};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::DrawEvent;

/// Resolved global settings shared by every subcommand.
pub struct CommandContext<'a> {
    pub config: &'a AppConfig,
    pub apify_token: Option<&'a str>,
    pub tracer: &'a TraceLogger,
}

// ============================================================================
// analyze subcommand
// ============================================================================

pub fn cmd_analyze(
    source: &SourceArgs,
    empty_keys: Option<EmptyKeyPolicy>,
    ctx: &CommandContext,
) -> Result<(), PickerError> {
    let policy = empty_keys.unwrap_or(ctx.config.pick.empty_keys);
    let (raw, label) = load_raw(source, ctx)?;
    let session = load_session(&raw, &label, policy)?;

    ctx.tracer
        .log(&DrawEvent::analyze(session.roster()).with_source(session.source()));

    print!("{}", format_stats(session.roster()));
    print!("{}", format_participants(session.roster()));
    Ok(())
}

// ============================================================================
// pick subcommand
// ============================================================================

pub struct PickOptions {
    pub count: Option<usize>,
    pub redraws: u32,
    pub export: Option<String>,
    pub format: Option<String>,
    pub empty_keys: Option<EmptyKeyPolicy>,
}

pub fn cmd_pick(
    source: &SourceArgs,
    options: &PickOptions,
    ctx: &CommandContext,
) -> Result<(), PickerError> {
    let policy = options.empty_keys.unwrap_or(ctx.config.pick.empty_keys);
    let count = options.count.unwrap_or(ctx.config.pick.count);

    let export = options.export.clone().or_else(|| ctx.config.export.output.clone());
    let format = options.format.as_deref().unwrap_or(&ctx.config.export.format);
    if export.is_some() {
        ExportFormat::parse(format)?;
    }

    let (raw, label) = load_raw(source, ctx)?;
    let mut session = load_session(&raw, &label, policy)?;

    ctx.tracer
        .log(&DrawEvent::analyze(session.roster()).with_source(session.source()));
    print!("{}", format_stats(session.roster()));

    let output = run_draws(&mut session, count, options.redraws, ctx.tracer)?;
    print!("{}", output);

    if let Some(path) = export {
        let today = chrono::Local::now().date_naive();
        let report = DrawReport::from_session(&session, today);
        let written = write_export(&report, &path, format)?;
        println!("\nExported results to {}", written.display());
    }

    Ok(())
}

/// Run the first draw plus `redraws` independent "pick again" draws,
/// logging each one. Returns the console rendering of every draw.
pub fn run_draws(
    session: &mut PickerSession,
    count: usize,
    redraws: u32,
    tracer: &TraceLogger,
) -> Result<String, PickerError> {
    let mut out = String::new();

    if count > session.roster().len() {
        warn!(
            requested = count,
            available = session.roster().len(),
            "more winners requested than participants, drawing everyone"
        );
    }

    session.pick(count)?;
    record_draw(session, count, tracer, &mut out);

    for _ in 0..redraws {
        session.pick_again()?;
        record_draw(session, count, tracer, &mut out);
    }

    Ok(out)
}

fn record_draw(session: &PickerSession, count: usize, tracer: &TraceLogger, out: &mut String) {
    let event = DrawEvent::pick(session.roster(), session.draws(), count, session.winners())
        .with_source(session.source());
    tracer.log(&event);
    info!(draw = session.draws(), winners = session.winners().len(), "draw complete");
    out.push_str(&format_draw(session.draws(), session.winners()));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Json,
}

impl ExportFormat {
    /// Case-insensitive; config files are not checked by clap.
    pub fn parse(format: &str) -> Result<Self, PickerError> {
        match format.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            _ => Err(PickerError::InvalidFormat(format.to_string())),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
        }
    }
}

/// Write `report` as text or JSON. An empty `path` means a dated file
/// name in the current directory.
pub fn write_export(
    report: &DrawReport,
    path: &str,
    format: &str,
) -> Result<PathBuf, PickerError> {
    let format = ExportFormat::parse(format)?;
    let content = match format {
        ExportFormat::Text => format_text_export(report),
        ExportFormat::Json => report.to_json()?,
    };
    let extension = format.extension();

    let target = if path.is_empty() {
        PathBuf::from(export_file_name(report, extension))
    } else {
        PathBuf::from(path)
    };

    std::fs::write(&target, content).map_err(|e| PickerError::io(target.display().to_string(), e))?;
    info!(path = %target.display(), ?format, "exported draw");
    Ok(target)
}

// ============================================================================
// fetch subcommand
// ============================================================================

pub fn cmd_fetch(url: &str, output: &str, ctx: &CommandContext) -> Result<(), PickerError> {
    let client = build_client(ctx)?;
    let comments = fetch_from(&client, url)?;

    save_comments(Path::new(output), &comments)?;
    println!("Fetched {} comments to {}", comments.len(), output);
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Read raw comments from whichever source was given, with a label for
/// reports (file path or post URL).
pub fn load_raw(
    source: &SourceArgs,
    ctx: &CommandContext,
) -> Result<(Vec<RawComment>, String), PickerError> {
    if let Some(path) = &source.input {
        info!(path = %path, "reading pasted comments");
        return Ok((read_pasted(path)?, path.clone()));
    }
    if let Some(path) = &source.comments {
        info!(path = %path, "reading comment file");
        return Ok((read_comments_json(path)?, path.clone()));
    }
    if let Some(url) = &source.url {
        let client = build_client(ctx)?;
        return Ok((fetch_from(&client, url)?, url.trim().to_string()));
    }
    // clap's group makes this unreachable from the command line
    Err(PickerError::NoComments)
}

/// Fetch through any source; an empty batch is reported as `NoComments`.
pub fn fetch_from(source: &dyn CommentSource, url: &str) -> Result<Vec<RawComment>, PickerError> {
    let comments = source.fetch(url)?;
    if comments.is_empty() {
        return Err(PickerError::NoComments);
    }
    Ok(comments)
}

/// Build a session, reporting empty input and empty rosters distinctly.
pub fn load_session(
    raw: &[RawComment],
    label: &str,
    policy: EmptyKeyPolicy,
) -> Result<PickerSession, PickerError> {
    if raw.is_empty() {
        return Err(PickerError::NoComments);
    }

    let session = PickerSession::load(raw, policy).with_source(label);
    let roster = session.roster();
    info!(
        total = roster.total,
        unique = roster.unique_count,
        duplicates = roster.duplicates_removed,
        "comments normalized"
    );

    if roster.is_empty() {
        return Err(PickerError::NoParticipants);
    }
    Ok(session)
}

fn build_client(ctx: &CommandContext) -> Result<ApifyClient, PickerError> {
    let settings = build_apify_settings(&ctx.config.apify, ctx.apify_token)?;
    ApifyClient::new(settings)
}
