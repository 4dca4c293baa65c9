use std::time::Duration;

use anyhow::{anyhow, ensure};
use chrono::Local;
use clap::Parser;
use druid::{AppLauncher, WindowDesc};
use tracing::info;

use clock::HourFormat;
use dial::ClockState;
use widget::{AppState, Pacing};

mod anim;
mod cli;
mod clock;
mod dial;
mod effects;
mod engine;
mod widget;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    cli::init_tracing(&cli.log_filter)?;

    match cli.toy {
        cli::Toy::Tictactoe { size, reset_delay_ms } => {
            play_tictactoe(size, Pacing { reset_ms: reset_delay_ms })
        },
        cli::Toy::Clock { twenty_four_hour, tick_ms } => {
            let format = if twenty_four_hour { HourFormat::TwentyFour } else { HourFormat::Twelve };
            show_clock(format, tick_ms)
        }
    }
}

fn play_tictactoe(size: f64, pacing: Pacing) -> anyhow::Result<()> {
    ensure!(size.is_finite() && size > 0.0, "window size must be positive, got {size}");
    let win = WindowDesc::new(widget::build_game())
        .title("Tic Tac Toe")
        .window_size((size, size * 1.2));

    info!(size, reset_ms = pacing.reset_ms, "launching tic-tac-toe");
    AppLauncher::with_window(win)
        .launch(AppState::new(pacing))
        .map_err(|err| anyhow!("failed to launch tic-tac-toe window: {err}"))
}

fn show_clock(format: HourFormat, tick_ms: u64) -> anyhow::Result<()> {
    let win = WindowDesc::new(dial::build_clock(Duration::from_millis(tick_ms)))
        .title("Elegant Digital & Analog Clock")
        .window_size((800.0, 700.0));

    info!(?format, tick_ms, "launching clock");
    AppLauncher::with_window(win)
        .launch(ClockState::new(Local::now().naive_local(), format))
        .map_err(|err| anyhow!("failed to launch clock window: {err}"))
}
