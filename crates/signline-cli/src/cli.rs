use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "signline",
    about = "Signline: event-aware sign line bindings, checked against an in-memory world",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run scenario files and check every step's expectation
    Run {
        /// Paths to scenario JSON files
        #[arg(required = true)]
        scenarios: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a TOML file of `[[binding]]` tables without a host
    CheckConfig {
        /// Path to the bindings TOML
        bindings: String,

        /// Validate for an event type that carries pending sign lines
        #[arg(long)]
        lifecycle: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
