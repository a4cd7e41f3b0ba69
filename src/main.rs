use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};

use gambit::logging::init_logging;
use gambit::{Cli, EngineConfig, UciSession, ENGINE_NAME};

fn run(cli: Cli) -> Result<()> {
    init_logging(cli.debug, cli.log.as_deref()).context("failed to initialise logging")?;
    info!(
        "[GAMBIT] {} {} starting",
        ENGINE_NAME,
        env!("CARGO_PKG_VERSION")
    );
    debug!("[GAMBIT] arguments: {:?}", cli);

    let mut config = EngineConfig::load_optional(cli.config.as_deref());
    cli.apply_to(&mut config);
    info!(
        "[GAMBIT] depth {}, workers {}, random {}",
        config.max_search_depth, config.workers, config.random
    );

    let seed = cli.seed.unwrap_or_else(rand::random::<u64>);
    debug!("[GAMBIT] Using random number seed {}", seed);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = UciSession::new(config, Some(seed), stdout.lock());
    session.run(stdin.lock()).context("UCI session failed")?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("[GAMBIT] fatal: {:#}", err);
            eprintln!("gambit: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
