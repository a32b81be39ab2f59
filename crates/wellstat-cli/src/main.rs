//! wellstat CLI - inspect and feed a wellstat telemetry database

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "wellstat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the database file [default: ./Persistence/TranServer.db]
    #[arg(short, long)]
    db_path: Option<PathBuf>,

    /// JSON store configuration; `--db-path` overrides its path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show success/failure counters
    Stats {
        /// Wellbore to show; all wellbores when omitted
        wellbore: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List events for a wellbore, most recent first
    Events {
        wellbore: String,

        /// Lower time bound as `seconds[.fraction]`
        #[arg(long)]
        begin: Option<String>,

        /// Exclude events exactly at the lower bound
        #[arg(long, requires = "begin")]
        begin_excluded: bool,

        /// Upper time bound as `seconds[.fraction]`
        #[arg(long)]
        end: Option<String>,

        /// Exclude events exactly at the upper bound
        #[arg(long, requires = "end")]
        end_excluded: bool,

        /// Maximum number of events (0 = no limit)
        #[arg(short, long, default_value_t = 0)]
        limit: u32,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Add to a wellbore's counters
    RecordStat {
        wellbore: String,
        succeed: u64,
        fail: u64,
    },

    /// Append an event to the log
    RecordEvent {
        wellbore: String,
        code: u32,
        seconds: u32,
        millis: u32,

        /// Auxiliary payload as hex
        #[arg(long)]
        aux_hex: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config = commands::load_config(cli.db_path, cli.config)?;

    // Execute command
    match cli.command {
        Commands::Stats { wellbore, json } => {
            commands::stats::execute(config, wellbore, json)?;
        }
        Commands::Events {
            wellbore,
            begin,
            begin_excluded,
            end,
            end_excluded,
            limit,
            json,
        } => {
            let range = commands::events::RangeArgs {
                begin,
                begin_excluded,
                end,
                end_excluded,
            };
            commands::events::execute(config, &wellbore, range, limit, json)?;
        }
        Commands::RecordStat {
            wellbore,
            succeed,
            fail,
        } => {
            commands::record::stat(config, &wellbore, succeed, fail)?;
        }
        Commands::RecordEvent {
            wellbore,
            code,
            seconds,
            millis,
            aux_hex,
        } => {
            commands::record::event(config, &wellbore, code, seconds, millis, aux_hex)?;
        }
    }

    Ok(())
}
