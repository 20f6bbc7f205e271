mod book;
mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod pipeline;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use cli::{Cli, Commands};
use tracing::info;

fn main() {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        // No subcommand selected; just show usage
        let _ = Cli::command().print_help();
        return;
    };

    if let Err(e) = logging::init(&cli.log_path) {
        eprintln!("{} {e}", "Error:".red());
        std::process::exit(1);
    }
    info!("starting m4bpack");

    let result = match command {
        Commands::Show => commands::show::run(&cli.config, cli.mode),
        Commands::Convert => commands::convert::run(&cli.config, cli.mode, cli.bitrate),
    };

    // Fatal errors were already recorded to the diagnostic stream when they
    // were raised; report the message alone, without a backtrace.
    if let Err(e) = result {
        info!("program stopped");
        eprintln!("{} {e}", "Error:".red());
        std::process::exit(1);
    }
}
