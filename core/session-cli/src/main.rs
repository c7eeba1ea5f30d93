//! portal-sessions: resolve tutoring portal session lists from the command line.
//!
//! Reads a session-list payload (bare array or paginated envelope) exported
//! from the backend and prints each session's badge and joinability.
//!
//! ## Subcommands
//!
//! - `resolve`: One-shot resolution of a list, human or JSON output
//! - `watch`: Re-resolve on a fixed tick and report bucket changes
//! - `join`: Print the meeting URL of a session if it can be joined now

mod input;
mod join;
mod logging;
mod resolve;
mod watch;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "portal-sessions")]
#[command(about = "Tutoring portal session status resolver")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.tutor-portal/sessions.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every session in a list once
    Resolve {
        /// Session list JSON (stdin when omitted or "-")
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Resolve as of this RFC 3339 instant instead of the system clock
        #[arg(long, value_name = "RFC3339")]
        now: Option<String>,

        /// Grace minutes before start (overrides config)
        #[arg(long)]
        grace: Option<u32>,

        /// Distinguish ongoing sessions from upcoming ones
        #[arg(long)]
        fine: bool,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Re-resolve a list on a fixed interval
    Watch {
        /// Session list JSON
        #[arg(long, value_name = "FILE")]
        input: PathBuf,

        /// Seconds between ticks (overrides config)
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,

        /// Stop after this many ticks
        #[arg(long)]
        ticks: Option<u64>,

        /// Start the clock at this RFC 3339 instant
        #[arg(long, value_name = "RFC3339")]
        now: Option<String>,
    },

    /// Print the meeting URL of a joinable session
    Join {
        /// Session list JSON (stdin when omitted or "-")
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Session id
        #[arg(long)]
        id: String,

        /// Resolve as of this RFC 3339 instant instead of the system clock
        #[arg(long, value_name = "RFC3339")]
        now: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    let _logging_guard = logging::init(cli.log_file.as_deref());

    let config = match session_core::load_config(cli.config.clone()) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "Failed to load session config");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Resolve {
            input,
            now,
            grace,
            fine,
            json,
        } => resolve::run(
            &config,
            resolve::ResolveArgs {
                input,
                now,
                grace,
                fine,
                json,
            },
        ),
        Commands::Watch {
            input,
            interval,
            ticks,
            now,
        } => watch::run(&config, &input, interval, ticks, now.as_deref()),
        Commands::Join { input, id, now } => join::run(&config, input, &id, now.as_deref()),
    };

    if let Err(err) = result {
        tracing::error!(error = %err, "portal-sessions failed");
        std::process::exit(1);
    }
}
