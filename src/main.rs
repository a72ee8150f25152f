use std::{process, sync::Arc};

use clap::Parser;
use log::{debug, error, info};
use tokio::sync::Mutex;

use ideaforge::{App, Cli, Config, FavoriteStore, Result, ResultCache};

fn initialize_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();

    debug!("Logger initialized");
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    initialize_logger(cli.verbose);

    info!("Application starting up");

    if let Err(e) = run(cli).await {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = Config::resolve_path(cli.config.as_deref());
    let mut config = Config::load(&config_path)?;

    if let Some(dir) = cli.favorites_dir {
        config.favorites_dir = dir;
    }

    // Load-at-start: the store reads its directory once here; every later
    // mutation writes through to disk.
    let mut store = FavoriteStore::new(config.favorites_dir.clone());
    let loaded = store.load()?;
    debug!("Loaded {} favorites", loaded);

    let results = ResultCache::new(config.results_path.clone());
    let app = App::new(
        Arc::new(Mutex::new(store)),
        results,
        config,
        config_path,
        cli.verbose,
    );

    app.run(cli.command).await
}
