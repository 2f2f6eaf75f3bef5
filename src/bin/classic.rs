use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use arcade_snake::classic::{ClassicEvent, ClassicGame};
use arcade_snake::config::{load_config, theme_by_name, ClassicConfig, ConfigError};
use arcade_snake::game::InputOutcome;
use arcade_snake::input::{pump_until, InputHandler};
use arcade_snake::logging::{self, default_log_path};
use arcade_snake::renderer;
use arcade_snake::score::PersistentScore;
use arcade_snake::terminal_runtime::{install_panic_hook, TerminalSession};
use clap::Parser;
use log::{error, info, warn};

/// Classic terminal Snake with a persisted high score.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// JSON config file. Defaults to the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// High score file. Defaults to the platform data directory.
    #[arg(long)]
    score_file: Option<PathBuf>,

    /// Seed for spawn positions, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

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
            eprintln!("classic-snake: {error}");
            return ExitCode::FAILURE;
        }
    };

    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| default_log_path("classic-snake"));
    if let Err(error) = logging::init(&log_path, cli.verbose) {
        eprintln!("classic-snake: logging disabled: {error}");
    }

    install_panic_hook();

    let store = cli
        .score_file
        .clone()
        .map_or_else(PersistentScore::at_default_location, PersistentScore::new);

    match run(config, &store, cli.seed) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("classic-snake failed: {error}");
            eprintln!("classic-snake: {error}");
            ExitCode::FAILURE
        }
    }
}

fn build_config(cli: &Cli) -> Result<ClassicConfig, ConfigError> {
    let config = load_config(cli.config.as_deref())?.classic;
    config.validate()?;
    Ok(config)
}

fn run(config: ClassicConfig, store: &PersistentScore, seed: Option<u64>) -> io::Result<()> {
    let theme = theme_by_name(&config.theme);
    let frame_delay = config.frame_delay();
    let high_score = store.load();
    info!(
        "starting classic session: {}x{} grid, high score {high_score} from {}",
        config.grid.width,
        config.grid.height,
        store.path().display()
    );

    let mut game = match seed {
        Some(seed) => ClassicGame::new_with_seed(config, high_score, seed),
        None => ClassicGame::new(config, high_score),
    };
    let mut terminal_session = TerminalSession::enter()?;
    let terminal = terminal_session.terminal_mut();
    let mut input = InputHandler::new();

    loop {
        terminal.draw(|frame| renderer::render_classic(frame, &game, theme))?;

        let frame_end = Instant::now() + frame_delay;
        let outcome = pump_until(
            frame_end,
            |timeout| input.poll_input(timeout),
            |game_input| game.apply_input(game_input),
        )?;
        if outcome == InputOutcome::Exit {
            break;
        }

        for event in game.step() {
            match event {
                ClassicEvent::NewHighScore(score) => save_score(store, score),
                ClassicEvent::Died(reason) => info!("snake died ({reason:?})"),
                ClassicEvent::Ate { .. } | ClassicEvent::Respawned => {}
            }
        }
    }

    save_score(store, game.high_score);
    info!("leaving with high score {}", game.high_score);
    Ok(())
}

fn save_score(store: &PersistentScore, score: u32) {
    if let Err(error) = store.save(score) {
        warn!(
            "failed to save high score to {}: {error}",
            store.path().display()
        );
    }
}
