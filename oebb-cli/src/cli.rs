//! Command-line arguments.

use std::path::PathBuf;

use chrono::{NaiveDateTime, NaiveTime};
use clap::{ArgAction, Args, Parser, Subcommand};
use oebb_cli::domain::DEFAULT_RESULT_COUNT;

#[derive(Debug, Parser)]
#[command(name = "oebb", version, about = "A command line client for the ÖBB Tickets API")]
pub struct Cli {
    /// API base URL
    #[arg(long, env = "OEBB_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout: u64,

    /// Directory for the cached session (defaults to the user cache dir)
    #[arg(long, env = "OEBB_CACHE_DIR", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Ignore the cached session and authenticate again
    #[arg(long, global = true)]
    pub refresh: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search connections
    Search(SearchArgs),
    /// List stations matching a name
    Stations(StationsArgs),
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Origin station
    pub from: String,

    /// Destination station
    pub to: String,

    /// Number of connections to request
    #[arg(short, long, default_value_t = DEFAULT_RESULT_COUNT)]
    pub results: u32,

    /// Departure time today (HH:MM); defaults to now
    #[arg(short, long, value_parser = parse_time_of_day)]
    pub time: Option<NaiveTime>,
}

impl SearchArgs {
    /// Departure timestamp: today at `--time`, or `now`.
    pub fn departure(&self, now: NaiveDateTime) -> NaiveDateTime {
        match self.time {
            Some(time) => now.date().and_time(time),
            None => now,
        }
    }
}

#[derive(Debug, Args)]
pub struct StationsArgs {
    /// Name to search for
    pub name: String,
}

impl Cli {
    /// Default log filter derived from `-v`.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

fn parse_time_of_day(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| format!("expected HH:MM, got {s:?}"))
}
