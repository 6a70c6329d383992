use clap::{CommandFactory, Parser};
use portscout::cli::{self, Cli};
use portscout::error::CliError;
use portscout::output;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let args = Cli::parse();

    match cli::execute(&args).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(CliError::Io(e)) => Err(anyhow::Error::new(e).context("failed to write scan output")),
        Err(e) => {
            output::print_error(&e.to_string());
            match e {
                CliError::MissingInput(_) => {
                    let _ = Cli::command().print_help();
                }
                CliError::ConflictingPresets => {
                    output::print_warning("You can check the manual using the option --help");
                }
                _ => {}
            }
            Ok(ExitCode::from(e.exit_code()))
        }
    }
}
