//! Signline CLI: the `signline` command.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { scenarios, json } => commands::run::run(scenarios, json),

        Commands::CheckConfig {
            bindings,
            lifecycle,
            json,
        } => commands::check_config::run(bindings, lifecycle, json),
    }
}
