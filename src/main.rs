use std::process::ExitCode;

use clap::Parser;
use layergen::cli::{Cli, Command};
use layergen::{LayerError, cmd, interrupt, logging};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let result = match cli.command {
        Command::Create(args) => cmd::create::run(args),
        Command::List(args) => cmd::list::run(args),
        Command::Delete(args) => cmd::delete::run(args),
        Command::Config(command) => cmd::config::run(command).map_err(LayerError::from),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!(code = error.code(), "command failed");
            eprintln!("Error: {error:#}");
            match error {
                LayerError::Interrupted => ExitCode::from(interrupt::INTERRUPTED_EXIT),
                _ => ExitCode::FAILURE,
            }
        }
    }
}
