use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use arcade_snake::config::{load_config, theme_by_name, ConfigError, Difficulty, GameConfig};
use arcade_snake::game::{GameSession, InputOutcome, SessionEvent};
use arcade_snake::input::{pump_until, GameInput, InputHandler};
use arcade_snake::logging::{self, default_log_path};
use arcade_snake::phase::Phase;
use arcade_snake::renderer;
use arcade_snake::terminal_runtime::{install_panic_hook, TerminalSession};
use arcade_snake::ui::menu::main_menu_item_at;
use clap::Parser;
use log::{debug, error, info};

/// Menu-driven terminal Snake with selectable difficulty.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// JSON config file. Defaults to the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Difficulty selected at startup.
    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Board width in cells.
    #[arg(long)]
    width: Option<u16>,

    /// Board height in cells.
    #[arg(long)]
    height: Option<u16>,

    /// Color theme name.
    #[arg(long)]
    theme: Option<String>,

    /// Seed for food placement, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Ring the terminal bell when food is eaten or the snake crashes.
    #[arg(long)]
    bell: bool,

    /// Log file path.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("arcade-snake: {error}");
            return ExitCode::FAILURE;
        }
    };

    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| default_log_path("arcade-snake"));
    if let Err(error) = logging::init(&log_path, cli.verbose) {
        eprintln!("arcade-snake: logging disabled: {error}");
    }

    install_panic_hook();

    match run(config, cli.seed, cli.bell) {
        Ok(()) => {
            info!("arcade-snake exited cleanly");
            ExitCode::SUCCESS
        }
        Err(error) => {
            error!("arcade-snake failed: {error}");
            eprintln!("arcade-snake: {error}");
            ExitCode::FAILURE
        }
    }
}

fn build_config(cli: &Cli) -> Result<GameConfig, ConfigError> {
    let mut config = load_config(cli.config.as_deref())?.arcade;

    if let Some(difficulty) = cli.difficulty {
        config.difficulty = difficulty;
    }
    if let Some(width) = cli.width {
        config.grid.width = width;
    }
    if let Some(height) = cli.height {
        config.grid.height = height;
    }
    if let Some(theme) = &cli.theme {
        config.theme.clone_from(theme);
    }

    config.validate()?;
    Ok(config)
}

fn run(config: GameConfig, seed: Option<u64>, bell: bool) -> io::Result<()> {
    let theme = theme_by_name(&config.theme);
    let frame_duration = config.frame_duration();
    info!(
        "starting arcade session: {}x{} grid, {} difficulty, {} fps",
        config.grid.width,
        config.grid.height,
        config.difficulty.label(),
        config.frame_rate
    );

    let mut session = match seed {
        Some(seed) => GameSession::new_with_seed(config, seed),
        None => GameSession::new(config),
    };
    let mut terminal_session = TerminalSession::enter()?;
    let terminal = terminal_session.terminal_mut();
    let mut input = InputHandler::new();
    let mut last_frame = Instant::now();

    loop {
        let screen = terminal
            .draw(|frame| renderer::render(frame, &session, theme))?
            .area;

        let frame_end = last_frame + frame_duration;
        let outcome = pump_until(
            frame_end,
            |timeout| input.poll_input(timeout),
            |game_input| match game_input {
                GameInput::Click { column, row } if session.phase() == Phase::Menu => {
                    match main_menu_item_at(screen, column, row) {
                        Some(item) => session.activate_menu_item(item),
                        None => InputOutcome::Continue,
                    }
                }
                other => session.apply_input(other),
            },
        )?;
        if outcome == InputOutcome::Exit {
            break;
        }

        let now = Instant::now();
        session.tick(now.duration_since(last_frame));
        last_frame = now;

        announce(session.drain_events(), bell)?;
    }

    info!("leaving with best score {}", session.high_score);
    Ok(())
}

fn announce(events: Vec<SessionEvent>, bell: bool) -> io::Result<()> {
    for event in events {
        match event {
            SessionEvent::Ate { points } => {
                debug!("food eaten (+{points})");
                ring(bell)?;
            }
            SessionEvent::Collided(reason) => {
                info!("round over: {reason:?}");
                ring(bell)?;
            }
            SessionEvent::NewHighScore(score) => info!("new high score {score}"),
            SessionEvent::PhaseChanged { from, to } => debug!("phase {from:?} -> {to:?}"),
            SessionEvent::MenuMoved => {}
        }
    }
    Ok(())
}

fn ring(bell: bool) -> io::Result<()> {
    if !bell {
        return Ok(());
    }

    let mut stdout = io::stdout();
    stdout.write_all(b"\x07")?;
    stdout.flush()
}
