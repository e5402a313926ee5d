use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paddock::QueryOptions;
use paddock::cli::commands;
use paddock::cli::{CommandContext, Output, OutputFormat};

#[derive(Parser)]
#[command(name = "paddock")]
#[command(
    version,
    about = "Formula 1 statistics with agent-first answers and direct-data fallback"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a free-text question
    Query {
        #[arg(help = "Question, e.g. \"Compare Max Verstappen and Lewis Hamilton\"")]
        text: String,
        #[arg(long, help = "Season override")]
        year: Option<i32>,
        #[arg(long, help = "Conversation thread to continue")]
        thread: Option<String>,
        #[arg(long, help = "Preferred specialist agent")]
        agent: Option<String>,
    },

    /// Championship standings
    Standings {
        #[arg(long, help = "Season (default: current)")]
        year: Option<i32>,
        #[arg(long, help = "Constructors' instead of drivers' standings")]
        constructors: bool,
    },

    /// Race calendar
    Races {
        #[arg(long, help = "Season (default: current)")]
        year: Option<i32>,
    },

    /// Next race of the current season
    NextRace,

    /// Drivers entered in a season
    Drivers {
        #[arg(long, help = "Season (default: current)")]
        year: Option<i32>,
    },

    /// Agents offered by the analysis service
    Agents,

    /// Overview of service health, season and standings
    Dashboard,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
    },
    /// Show configuration file paths
    Path,
    /// Write a default configuration file
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mPaddock encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let out = Output::new(cli.format);

    // Config commands work without reachable services
    let command = match cli.command {
        Commands::Config { action } => {
            match action {
                ConfigAction::Show { global } => commands::config::show(global, &out)?,
                ConfigAction::Path => commands::config::path()?,
                ConfigAction::Init { global, force } => {
                    commands::config::init(global, force, &out)?
                }
            }
            return Ok(());
        }
        command => command,
    };

    let ctx = CommandContext::load()?;
    let rt = Runtime::new()?;

    rt.block_on(async {
        match command {
            Commands::Query {
                text,
                year,
                thread,
                agent,
            } => {
                let options = QueryOptions {
                    year,
                    thread_id: thread,
                    agent_id: agent,
                };
                commands::query::run(&ctx, &text, options, &out).await
            }
            Commands::Standings { year, constructors } => {
                commands::stats::standings(&ctx, year, constructors, &out).await
            }
            Commands::Races { year } => commands::stats::races(&ctx, year, &out).await,
            Commands::NextRace => commands::stats::next_race(&ctx, &out).await,
            Commands::Drivers { year } => commands::stats::drivers(&ctx, year, &out).await,
            Commands::Agents => commands::stats::agents(&ctx, &out).await,
            Commands::Dashboard => commands::dashboard::run(&ctx, &out).await,
            Commands::Config { .. } => Ok(()),
        }
    })?;

    Ok(())
}
