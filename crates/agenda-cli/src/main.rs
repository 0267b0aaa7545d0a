//! `agenda` CLI: build greedy task plans and inspect availability capacity.
//!
//! ## Usage
//!
//! ```sh
//! # Plan a request (stdin → stdout), pretty-printed JSON
//! agenda plan < request.json
//!
//! # Plan from file to file, pinning the clock
//! agenda plan -i request.json -o plan.json --now 2026-03-16T08:00:00Z
//!
//! # Show the working capacity of an availability
//! agenda capacity -i availability.json
//!
//! # Debug logging on stderr
//! agenda -vv plan -i request.json
//! ```

mod request;

use std::io::{self, Read};

use agenda_engine::{Availability, SchedulingPolicy};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::request::{CapacityReport, PlanRequest};

#[derive(Parser)]
#[command(
    name = "agenda",
    version,
    about = "Greedy task planning over recurring availability rules"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a plan from a JSON request {availability, todo_lists, tasks, now?}
    Plan {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Planning instant (RFC 3339); overrides the request's `now`
        #[arg(long)]
        now: Option<DateTime<Utc>>,
        /// Emit single-line JSON instead of pretty-printed JSON
        #[arg(long)]
        compact: bool,
    },
    /// Report the working capacity of an availability JSON document
    Capacity {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Emit single-line JSON instead of pretty-printed JSON
        #[arg(long)]
        compact: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Plan {
            input,
            output,
            now,
            compact,
        } => {
            let raw = read_input(input.as_deref())?;
            let request: PlanRequest =
                serde_json::from_str(&raw).context("Failed to parse plan request")?;
            let plan_input = request.into_plan_input(now);
            info!(
                availability_id = plan_input.availability.id(),
                now = %plan_input.options.now,
                tasks = plan_input.tasks.len(),
                "building plan"
            );

            let plan = SchedulingPolicy::greedy()
                .build_plan(&plan_input)
                .context("Failed to build plan")?;
            write_output(output.as_deref(), &to_json(&plan, compact)?)?;
        }
        Commands::Capacity {
            input,
            output,
            compact,
        } => {
            let raw = read_input(input.as_deref())?;
            let availability: Availability =
                serde_json::from_str(&raw).context("Failed to parse availability")?;
            let report = CapacityReport::from(&availability);
            write_output(output.as_deref(), &to_json(&report, compact)?)?;
        }
    }

    Ok(())
}

/// Install a stderr subscriber whose level follows the `-v` count.
fn setup_logging(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set default tracing subscriber")
}

fn to_json<T: Serialize>(value: &T, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
