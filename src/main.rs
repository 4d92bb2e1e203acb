use clap::Parser;
use comment_picker::cli::commands::{CommandContext, PickOptions, cmd_analyze, cmd_fetch, cmd_pick};
use comment_picker::cli::config::{Cli, Commands, load_config};
use comment_picker::cli::logging::init_tracing;
use comment_picker::trace::logger::TraceLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_deref());

    // Audit trail: CLI path > config path; config can switch it off
    let tracer = match (&cli.trace, config.trace.enabled) {
        (Some(path), _) => TraceLogger::new(path),
        (None, true) => TraceLogger::new(&config.trace.path),
        (None, false) => TraceLogger::disabled(),
    };

    let ctx = CommandContext {
        config: &config,
        apify_token: cli.apify_token.as_deref(),
        tracer: &tracer,
    };

    match cli.command {
        Commands::Analyze { source, empty_keys } => {
            cmd_analyze(&source, empty_keys, &ctx)?;
        }
        Commands::Pick {
            source,
            count,
            redraws,
            export,
            format,
            empty_keys,
        } => {
            let options = PickOptions {
                count,
                redraws,
                export,
                format,
                empty_keys,
            };
            cmd_pick(&source, &options, &ctx)?;
        }
        Commands::Fetch { url, output } => {
            cmd_fetch(&url, &output, &ctx)?;
        }
    }

    Ok(())
}
