use anyhow::anyhow;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "desktoys", version, about = "Tic-tac-toe and an analog clock for the desktop")]
pub struct Cli {
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    pub log_filter: String,

    #[command(subcommand)]
    pub toy: Toy
}

#[derive(Debug, PartialEq, Subcommand)]
pub enum Toy {
    /// Play tic-tac-toe.
    Tictactoe {
        /// Window width in pixels; the height is a fifth larger.
        #[arg(long, default_value_t = 500.0)]
        size: f64,
        /// Pause after announcing the result before the board clears.
        #[arg(long, default_value_t = 1500)]
        reset_delay_ms: u64
    },
    /// Show the analog and digital clock.
    Clock {
        /// Start in 24-hour mode.
        #[arg(long)]
        twenty_four_hour: bool,
        /// Redraw interval in milliseconds.
        #[arg(long, default_value_t = 33, value_parser = clap::value_parser!(u64).range(1..))]
        tick_ms: u64
    }
}

pub fn init_tracing(fallback: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(fallback)?
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow!(err))
}
