use creature_arena::catalog::Catalog;
use creature_arena::config::GameConfig;
use creature_arena::console::Console;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = GameConfig::from_env();
    tracing::debug!(?config, "configuration");

    print!("Loading difficulties, creatures, evolutions, element interactions");
    let catalog = match Catalog::load_all(&config.data_dir) {
        Ok(catalog) => Arc::new(catalog),
        Err(err) => {
            println!(" - FAILED.");
            tracing::error!(%err, data_dir = %config.data_dir.display(), "cannot load game data");
            eprintln!("Error loading game data: {}", err);
            return ExitCode::FAILURE;
        }
    };
    println!(" - OK.");

    let rng = config.rng();
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock(), catalog, config, rng);

    match console.run() {
        Ok(()) => {
            println!("Disposing game - OK.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(%err, "game aborted");
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
