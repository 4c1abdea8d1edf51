use std::path::PathBuf;

use clap::Parser;

/// JetClock: kiosk clock host with plugin slots.
#[derive(Parser, Debug)]
#[command(name = "jetclock", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter directive, e.g. `jetclock=debug`. Overrides `logging.level`.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Load a plugin UI at startup. May be repeated; adds to `plugins.autoload`.
    #[arg(long = "plugin", value_name = "URL")]
    pub plugins: Vec<String>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    pub print_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
