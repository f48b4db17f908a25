//! `killword` - last-player-standing word game

use clap::Parser;

use killword::cli::args::Cli;
use killword::cli::commands;
use killword::error::ExitCode;
use killword::observability::{LogFormat, init_logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(LogFormat::from(cli.log_format), cli.verbose, cli.color);
    }

    match commands::dispatch(cli).await {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
