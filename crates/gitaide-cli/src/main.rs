//! CLI entry point - the composition root.
//!
//! Parses arguments, wires the context through bootstrap and dispatches to
//! handlers. Errors are classified into exit codes here and nowhere else.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use gitaide_cli::handlers::{
    self, release::ReleaseArgs, review::ReviewArgs, standup::StandupArgs,
};
use gitaide_cli::{Cli, CliConfig, CliError, Commands, bootstrap, watch_interrupts};

#[tokio::main]
async fn main() -> ExitCode {
    // .env in the config root feeds the GITAIDE_* fallbacks of the parser
    let dotenv = gitaide_core::env_file_path()
        .ok()
        .map(|path| (dotenvy::from_path(&path), path));

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match dotenv {
        Some((Ok(()), path)) => debug!(path = %path.display(), "loaded .env"),
        Some((Err(e), path)) if !e.not_found() => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable .env");
        }
        _ => {}
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let err = CliError::classify(&err);
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

/// Logs go to stderr so they never mix with assistant output.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::from_cli(&cli);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let ctx = bootstrap(&config)?;
    watch_interrupts(ctx.cancel.clone());

    match command {
        Commands::Review { base, staged, focus } => {
            handlers::review::execute(&ctx, ReviewArgs { base, staged, focus }).await
        }
        Commands::Pr { base, draft } => handlers::pr::execute(&ctx, base, draft).await,
        Commands::Release {
            version,
            date,
            no_assistant,
        } => {
            let args = ReleaseArgs {
                version,
                date,
                no_assistant,
            };
            handlers::release::execute(&ctx, args).await
        }
        Commands::Standup {
            since,
            author,
            output,
        } => {
            let args = StandupArgs {
                since,
                author,
                output,
            };
            handlers::standup::execute(&ctx, args).await
        }
        Commands::Ask { prompt } => handlers::ask::execute(&ctx, &prompt).await,
        Commands::Doctor => handlers::doctor::execute(&ctx).await,
        Commands::Config { command } => handlers::config::execute(&ctx, command),
    }
}
