use std::fs::File;
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use autosnake::config::{EngineConfig, SpeedTier};
use autosnake::game::GameState;
use autosnake::grid::GridBounds;
use autosnake::input::{GameInput, poll_input};
use autosnake::renderer;
use autosnake::terminal_runtime::{TerminalSession, restore_terminal};
use autosnake::ui::hud::ViewOptions;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Watch an A*-driven snake play itself in the terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Initial speed tier.
    #[arg(short, long, value_enum, ignore_case = true)]
    speed: Option<SpeedTier>,

    /// Show the planned path toward the food.
    #[arg(short, long)]
    vision: bool,

    /// Start with the status and controls rows hidden.
    #[arg(short = 'u', long = "hide-ui")]
    hide_ui: bool,

    /// Seed for food placement, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Settings file (defaults to the platform config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write diagnostics to this file; filter with RUST_LOG.
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match EngineConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("autosnake: {error}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(speed) = cli.speed {
        config.speed = speed;
    }
    config.vision |= cli.vision;
    config.hide_ui |= cli.hide_ui;

    if let Err(error) = init_tracing(cli.log.as_deref()) {
        eprintln!("autosnake: failed to set up logging: {error}");
        return ExitCode::FAILURE;
    }

    install_panic_hook();

    match run(&config, cli.seed) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("autosnake: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &EngineConfig, seed: Option<u64>) -> io::Result<()> {
    let (columns, rows) = crossterm::terminal::size()?;
    let mut state =
        GameState::for_terminal(columns, rows, config, seed).map_err(io::Error::other)?;
    let mut view = ViewOptions {
        show_vision: config.vision,
        hide_ui: config.hide_ui,
    };
    info!(columns, rows, speed = %state.speed, "session started");

    let mut session = TerminalSession::enter()?;
    let mut too_small = false;

    loop {
        let frame_started = Instant::now();

        if let Some(input) = poll_input(Duration::ZERO)? {
            if input == GameInput::Quit {
                break;
            }
            handle_input(&mut state, &mut view, input);
        }

        let (columns, rows) = session.size()?;
        match GridBounds::from_terminal(columns, rows) {
            Ok(bounds) => {
                too_small = false;
                state.resize(bounds);
            }
            Err(error) => {
                if !too_small {
                    warn!(%error, "simulation suspended");
                }
                too_small = true;
            }
        }

        if !too_small {
            let outcome = state.tick(Instant::now());
            if outcome.game_over {
                state.restart_if_over();
            }
        }

        session
            .terminal_mut()
            .draw(|frame| renderer::render(frame, &state, view, too_small))?;

        let delay = state.speed.tick_delay();
        let elapsed = frame_started.elapsed();
        if elapsed < delay {
            thread::sleep(delay - elapsed);
        }
    }

    info!(high_score = state.high_score.max(state.score), "session ended");
    Ok(())
}

fn handle_input(state: &mut GameState, view: &mut ViewOptions, input: GameInput) {
    match input {
        GameInput::SpeedUp => state.speed = state.speed.faster(),
        GameInput::SpeedDown => state.speed = state.speed.slower(),
        GameInput::Pause => state.toggle_pause(),
        GameInput::Reset => state.reset(),
        GameInput::ToggleVision => view.show_vision = !view.show_vision,
        GameInput::ToggleUi => view.hide_ui = !view.hide_ui,
        GameInput::Quit => {}
    }
}

fn init_tracing(path: Option<&Path>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(io::Error::other)
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        default_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use autosnake::config::SpeedTier;
    use clap::Parser;

    use super::Cli;

    #[test]
    fn speed_names_ignore_case() {
        for (arg, expected) in [
            ("Fast", SpeedTier::Fast),
            ("WTF", SpeedTier::Wtf),
            ("insane", SpeedTier::Insane),
            ("N", SpeedTier::Normal),
        ] {
            let cli = Cli::try_parse_from(["autosnake", "-s", arg]).expect("speed should parse");
            assert_eq!(cli.speed, Some(expected));
        }
        assert!(Cli::try_parse_from(["autosnake", "-s", "ludicrous"]).is_err());
    }
}
