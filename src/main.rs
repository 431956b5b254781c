//! Barracks CLI - manage an IoT fleet from the terminal

use barracks_cli::cli::Cli;
use barracks_cli::{commands, logging, CliError};
use console::style;

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    std::process::exit(exit_code);
}

/// Main application entry point
async fn run() -> i32 {
    let cli = Cli::parse_args();
    logging::init(cli.verbose);
    tracing::debug!("Barracks CLI v{}", barracks_cli::VERSION);

    match commands::execute(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{} {err:#}", style("Error:").red().bold());
            exit_code(&err)
        }
    }
}

/// Exit code of the underlying [`CliError`], or 1 for anything else
fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<CliError>())
        .map_or(1, CliError::exit_code)
}
