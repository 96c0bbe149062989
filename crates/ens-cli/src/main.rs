use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    materialize::{self, MaterializeArgs},
    strategies,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "ens-sim", about = "Ensemble materialization CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expand an ensemble configuration into named job specifications.
    Materialize(MaterializeArgs),
    /// List the registered permutation and combination strategies.
    Strategies,
}

fn main() -> Result<(), Box<dyn Error>> {
    // RUST_LOG overrides the default filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ens_gen=info,ens_sim=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Materialize(args) => materialize::run(&args),
        Command::Strategies => strategies::run(),
    }
}
