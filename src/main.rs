use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use shatranj::chess::core::Color;
use shatranj::chess::game::{Game, GameConfig};
use shatranj::Engine;

/// Plays a game of Shatranj over a line-oriented text protocol on
/// stdin/stdout.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON file with the game settings. Missing fields take their defaults.
    #[arg(long, conflicts_with = "position")]
    config: Option<PathBuf>,

    /// Starting position in position notation, e.g. "WSHD1|BSHD8|".
    #[arg(long)]
    position: Option<String>,

    /// Side to move first.
    #[arg(long, value_parser = parse_color)]
    turn: Option<Color>,

    /// Enable debug logging.
    #[arg(short, long)]
    debug: bool,
}

fn parse_color(color: &str) -> anyhow::Result<Color> {
    Color::try_from(color)
}

fn load_game(args: &Args) -> anyhow::Result<Game> {
    let mut config = match (&args.config, &args.position) {
        (Some(path), _) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading config from {}", path.display()))?;
            serde_json::from_str::<GameConfig>(&contents)
                .with_context(|| format!("parsing config from {}", path.display()))?
        },
        (None, Some(notation)) => GameConfig::from_notation(
            shatranj::chess::core::BOARD_WIDTH,
            shatranj::chess::core::BOARD_HEIGHT,
            notation,
            Color::White,
        )?,
        (None, None) => GameConfig::default(),
    };
    if let Some(turn) = args.turn {
        config.turn = turn;
    }
    Game::new(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .target(env_logger::Target::Stderr)
        .init();
    log::info!("Shatranj engine {}", shatranj::engine_version());

    let game = load_game(&args)?;
    log::debug!("Starting position: {}", game.board());

    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    Engine::new(game, &mut input, &mut output).run()
}
