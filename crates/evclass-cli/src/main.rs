use std::fs::File;
use std::io::{self, BufReader, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use evclass_cli::commands::{identities, series, session, util};
use evclass_cli::{Cli, Commands, Config};
use evclass_core::{IdentityId, SessionController};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so table output stays clean
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Some(Commands::Identities { source, json }) => {
            let provider = util::load_series(source, &config)?;
            identities::run(&mut out, &provider, *json)?;
        }
        Some(Commands::Series {
            identity,
            source,
            json,
        }) => {
            let identity: IdentityId = identity.parse().context("invalid identity")?;
            let provider = util::load_series(source, &config)?;
            series::run(&mut out, &provider, &identity, *json)?;
        }
        Some(Commands::Session {
            source,
            script,
            json,
            reject_reversed,
            allow_unknown,
        }) => {
            let provider = util::load_series(source, &config)?;
            let options = session::options(&config, *reject_reversed, *allow_unknown);
            let mut controller = SessionController::with_options(provider, options);

            if let Some(path) = script {
                let file = File::open(path)
                    .with_context(|| format!("failed to open {}", path.display()))?;
                session::run(BufReader::new(file), &mut out, &mut controller, *json)?;
            } else {
                session::run(io::stdin().lock(), &mut out, &mut controller, *json)?;
            }
            tracing::debug!(
                intervals = controller.table().len(),
                revision = controller.revision(),
                "session finished"
            );
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            writeln!(out)?;
        }
    }

    Ok(())
}
