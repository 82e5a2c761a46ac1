use std::{
    path::{Path, PathBuf},
    sync::mpsc,
};

use clap::{Parser, Subcommand};
use smashpad_core::{
    Collaborators, EventScript, FeedbackDispatcher, NoKeyBlocker, Palette, SessionConfig,
    SessionController, SessionHandle, Size, StaticTopology, StoreSnapshot, WordList,
};
use tracing_subscriber::EnvFilter;

mod console;

use console::{LoggingPlayer, LoggingSpeaker, StdinCapture};

fn main() -> smashpad_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Live { config, surfaces } => run_live(config, surfaces),
        Commands::Replay {
            script,
            config,
            surfaces,
            seed,
        } => run_replay(&script, config, surfaces, seed),
        Commands::DefaultConfig { output } => {
            SessionConfig::default().save(&output)?;
            tracing::info!(?output, "wrote default configuration");
            Ok(())
        }
    }
}

fn run_live(config: Option<PathBuf>, surfaces: usize) -> smashpad_core::Result<()> {
    let config = load_config(config)?;
    tracing::info!(?config, surfaces, "starting live session");

    let (done_tx, done_rx) = mpsc::channel();
    let collaborators = Collaborators {
        capture: Box::new(StdinCapture::new(done_tx)),
        ..headless_collaborators(surfaces)
    };
    let controller = SessionController::new(config, collaborators);
    let handle = SessionHandle::spawn(controller)?;

    // Runs until stdin closes.
    let _ = done_rx.recv();

    let snapshot = handle.snapshot()?;
    tracing::info!(
        figures = snapshot.figures.len(),
        trails = snapshot.trails.len(),
        "input closed, stopping session"
    );
    handle.stop()?;
    Ok(())
}

fn run_replay(
    script: &Path,
    config: Option<PathBuf>,
    surfaces: usize,
    seed: Option<u64>,
) -> smashpad_core::Result<()> {
    let config = load_config(config)?;
    let script = EventScript::load(script)?;
    tracing::info!(events = script.events.len(), "replaying event script");

    let collaborators = headless_collaborators(surfaces);
    let mut controller = match seed {
        Some(seed) => SessionController::with_seed(config, collaborators, seed),
        None => SessionController::new(config, collaborators),
    };

    let end = script.replay(&mut controller);
    print_snapshot(end, &controller.snapshot())
}

fn load_config(path: Option<PathBuf>) -> smashpad_core::Result<SessionConfig> {
    match path {
        Some(path) => SessionConfig::load(path),
        None => Ok(SessionConfig::default()),
    }
}

fn headless_collaborators(surfaces: usize) -> Collaborators {
    Collaborators {
        feedback: Box::new(FeedbackDispatcher::spawn(
            Box::new(LoggingPlayer),
            Box::new(LoggingSpeaker),
        )),
        words: Box::new(WordList::default()),
        theme: Box::new(Palette::default()),
        key_blocker: Box::new(NoKeyBlocker::default()),
        capture: Box::new(smashpad_core::ManualCapture::new()),
        topology: Box::new(StaticTopology::new(
            (0..surfaces.max(1)).map(|_| Size::new(1920.0, 1080.0)),
        )),
    }
}

fn print_snapshot(end: f64, snapshot: &StoreSnapshot) -> smashpad_core::Result<()> {
    let output = serde_json::json!({
        "ended_at": end,
        "figures": snapshot.figures.as_ref(),
        "trails": snapshot.trails.as_ref(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Keyboard smashing toy for small children", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a session, treating every character typed on stdin as a key press.
    Live {
        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of simulated displays.
        #[arg(long, default_value_t = 1)]
        surfaces: usize,
    },
    /// Replay a JSON event script and print the resulting figures and trails.
    Replay {
        /// Path to the event script.
        script: PathBuf,
        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of simulated displays.
        #[arg(long, default_value_t = 1)]
        surfaces: usize,
        /// Seed for placement and styling, for reproducible output.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Write the default configuration to a file.
    DefaultConfig {
        /// Output path for the configuration file.
        output: PathBuf,
    },
}
