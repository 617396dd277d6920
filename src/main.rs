use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use neon_snake::config::{GridSize, SimulationConfig, THEME_NEON};
use neon_snake::error::ConfigError;
use neon_snake::game::{Control, GameSession};
use neon_snake::input::InputHandler;
use neon_snake::logging::init_file_logging;
use neon_snake::renderer;
use neon_snake::score::{HighScoreStore, JsonFileStore, MemoryStore};
use neon_snake::simulation::SnakeSimulation;
use neon_snake::terminal_runtime::{install_panic_hook, Screen};
use neon_snake::ui::hud::HudInfo;
use neon_snake::wallet::{NoProvider, StaticProvider, WalletProvider, WalletSession};
use tracing::info;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON file overriding simulation rules.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Edge length of the square grid.
    #[arg(long, value_name = "N")]
    grid: Option<u16>,

    /// Seed for food placement, for reproducible games.
    #[arg(long)]
    seed: Option<u64>,

    /// Append logs to this file (filter with RUST_LOG).
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Show this wallet address as the connected account.
    #[arg(long, value_name = "ADDRESS")]
    wallet: Option<String>,

    /// Balance reported for --wallet, as hex wei.
    #[arg(long, value_name = "HEX_WEI", default_value = "0x0")]
    wallet_balance: String,

    /// Origin used to build the referral link.
    #[arg(long, value_name = "URL", default_value = "http://localhost:8080")]
    referral_origin: String,

    /// Keep the high score in memory only.
    #[arg(long)]
    no_save: bool,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log {
        init_file_logging(path)?;
    }

    let config = build_config(&cli)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;
    info!(?config, seed = ?cli.seed, "starting neon-snake");

    let simulation = match cli.seed {
        Some(seed) => SnakeSimulation::with_seed(config, seed),
        None => SnakeSimulation::new(config),
    };
    let store: Box<dyn HighScoreStore> = if cli.no_save {
        Box::new(MemoryStore::default())
    } else {
        Box::new(JsonFileStore::at_default_location())
    };
    let provider: Box<dyn WalletProvider> = match &cli.wallet {
        Some(address) => Box::new(StaticProvider::new(
            Some(address.clone()),
            cli.wallet_balance.clone(),
        )),
        None => Box::new(NoProvider),
    };
    let mut session = GameSession::new(simulation, store, WalletSession::new(provider));

    install_panic_hook();
    let mut screen = Screen::enter()?;
    run(&mut screen, &mut session, &cli.referral_origin)
}

fn run(
    screen: &mut Screen,
    session: &mut GameSession,
    referral_origin: &str,
) -> io::Result<()> {
    let mut input = InputHandler::new();

    loop {
        let snapshot = session.snapshot();
        let phase = session.phase();
        let hud = HudInfo {
            high_score: session.scores().high_score(),
            theme: &THEME_NEON,
            wallet: session.wallet().status(),
            notice: session.notices().last(),
            referral_origin,
        };
        screen.draw(|frame| renderer::render(frame, &snapshot, phase, &hud))?;

        let timeout = session
            .driver()
            .time_until_due(Instant::now())
            .map_or(FRAME_INTERVAL, |due| due.min(FRAME_INTERVAL));

        if let Some(game_input) = input.poll_input(timeout)? {
            if session.handle_input(game_input, Instant::now()) == Control::Quit {
                break;
            }
        }

        session.poll_wallet();
        let _ = session.tick(Instant::now());
    }

    info!(
        high_score = session.scores().high_score(),
        "session ended"
    );
    Ok(())
}

fn build_config(cli: &Cli) -> Result<SimulationConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    if let Some(dimension) = cli.grid {
        config.grid_size = GridSize::square(dimension);
        let last = i32::from(dimension.saturating_sub(1));
        config.start = (config.start.0.min(last), config.start.1.min(last));
    }

    config.validate()?;
    Ok(config)
}
