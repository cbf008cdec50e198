use std::path::PathBuf;

use clap::Parser;

/// Parley: talk to a REST dialog backend by voice.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error, or a full filter
    /// directive).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Backend webhook URL, overriding the config and environment.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Start one chat right away and exit when it ends.
    #[arg(long)]
    pub once: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
