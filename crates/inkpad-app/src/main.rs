//! Main application entry point (native).

use clap::Parser;
use inkpad_app::{App, AppConfig, AppError, Script, ShortcutRegistry};
use inkpad_core::storage::FileStore;
use inkpad_core::{HistoryPersistence, KeyValueStore, MemoryStore};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "inkpad", about = "Replay drawing input and export the canvas as PNG")]
struct Cli {
    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input script to replay (JSON array of steps).
    #[arg(long)]
    script: Option<PathBuf>,

    /// Write the visible scene to this PNG file.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Directory for persisted history, overriding the config.
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    /// Keep history in memory only.
    #[arg(long, conflicts_with = "storage_dir")]
    memory: bool,

    /// Forget persisted history before starting.
    #[arg(long)]
    reset: bool,

    /// Print keyboard shortcuts and exit.
    #[arg(long)]
    shortcuts: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting Inkpad");

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    if cli.shortcuts {
        ShortcutRegistry::print_all();
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if cli.storage_dir.is_some() {
        config.storage_dir = cli.storage_dir.clone();
    }

    if cli.memory {
        return run_with(&cli, config, MemoryStore::new());
    }
    let store = match &config.storage_dir {
        Some(dir) => FileStore::new(dir.clone())?,
        None => FileStore::default_location()?,
    };
    log::info!("Persisting history in {}", store.base_path().display());
    run_with(&cli, config, store)
}

fn run_with<S: KeyValueStore>(cli: &Cli, config: AppConfig, store: S) -> Result<(), AppError> {
    if cli.reset {
        HistoryPersistence::with_config(&store, &config.session).clear()?;
        log::info!("Cleared persisted history");
    }

    let mut app = App::new(config, store)?;
    if let Some(path) = &cli.script {
        app.run_script(&Script::load(path)?)?;
    }
    if let Some(path) = &cli.output {
        app.export_png_to(path)?;
    }

    let history = app.session().history();
    log::info!(
        "Done: {} shapes visible, history {}/{}",
        app.session().visible_scene().len(),
        history.cursor() + 1,
        history.len()
    );
    Ok(())
}
