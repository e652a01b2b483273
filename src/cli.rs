//! CLI argument definitions for fallnote.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "fallnote")]
#[command(about = "Four-lane falling-note rhythm game", version)]
pub struct Args {
    /// Chart CSV to play (defaults to the settings chart, then a generated demo)
    #[arg(value_name = "CHART")]
    pub chart: Option<PathBuf>,

    /// Let the bot play the chart on a virtual clock
    #[arg(long)]
    pub autoplay: bool,

    /// Play back a recorded replay instead of reading input
    #[arg(long, value_name = "FILE", conflicts_with = "autoplay")]
    pub replay: Option<PathBuf>,

    /// Real-time session fed by key events on stdin (`<code> <down|repeat|up>` per line)
    #[arg(long, conflicts_with_all = ["autoplay", "replay"])]
    pub stdin: bool,

    /// Settings file to use instead of ./settings.toml
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Override the initial RNG seed
    #[arg(long)]
    pub seed: Option<u32>,
}
