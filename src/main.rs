//! Grocefy binary entry point.

use std::process::ExitCode;

use grocefy::api::serve_with_state;
use grocefy::cli::{self, Args};
use grocefy::config::Config;
use grocefy::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("Run with --help for usage.");
            return ExitCode::FAILURE;
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }
    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(args)?;
    logging::init_with_filter(config.log_filter()).ok();

    tracing::info!("grocefy v{}", env!("CARGO_PKG_VERSION"));

    let server_config = config.to_server_config()?;
    let state = config.build_state()?;

    if config.session.in_memory {
        tracing::info!("Session kept in memory only");
    } else {
        tracing::info!(dir = %config.session.data_dir.display(), "Session storage ready");
    }
    if let Some(user) = state.store.user() {
        tracing::info!(name = %user.name, "Resuming stored session");
    }

    serve_with_state(server_config, state).await?;
    Ok(())
}
