#![allow(clippy::missing_errors_doc)]

use std::{path::PathBuf, time::Duration};

use chrono::{FixedOffset, Local, Offset};
use clap::Parser;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "weather-chart",
    version,
    about = "Weather forecast chart card in the terminal"
)]
pub struct Cli {
    /// Card configuration (JSON)
    #[arg(long)]
    pub config: PathBuf,

    /// Host state snapshot with entity states, language and unit system (JSON)
    #[arg(long)]
    pub states: PathBuf,

    /// Recorded forecast pushes, `{"daily": [...], "hourly": [...]}` (JSON)
    #[arg(long)]
    pub forecast: PathBuf,

    /// Locale override, takes precedence over the card and host language
    #[arg(long)]
    pub locale: Option<String>,

    /// Extra translation tables, `{"<locale>": {"<key>": "..."}}` (JSON)
    #[arg(long)]
    pub translations: Option<PathBuf>,

    /// Card width in terminal columns for --one-shot
    #[arg(long, default_value_t = 80)]
    pub width: u16,

    /// UTC offset used for labels and day/night, e.g. +01:00 (default: local)
    #[arg(long, allow_hyphen_values = true)]
    pub utc_offset: Option<FixedOffset>,

    /// Lay the chart out right to left
    #[arg(long)]
    pub rtl: bool,

    /// Delay before a deferred chart draw is retried
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..=1000))]
    pub frame_ms: u64,

    /// Spacing between replayed forecast pushes in milliseconds
    #[arg(long)]
    pub replay_interval_ms: Option<u64>,

    /// Print the card and forecast table to stdout and exit (non-interactive)
    #[arg(long)]
    pub one_shot: bool,

    /// Write logs to this file in interactive mode
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    #[must_use]
    pub fn offset(&self) -> FixedOffset {
        self.utc_offset
            .unwrap_or_else(|| Local::now().offset().fix())
    }

    #[must_use]
    pub fn replay_interval(&self) -> Option<Duration> {
        self.replay_interval_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}
