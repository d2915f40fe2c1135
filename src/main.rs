mod cli;
mod features;
mod fetch;
mod flatten;
mod swath;
mod writer;

use anyhow::{Error, Result};
use clap::Parser;
use cli::{command, Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    let outcome = match &cli.command {
        Commands::Extract(args) => command::extract(args),
        Commands::Merge(args) => command::merge(args),
        Commands::Fetch(args) => command::fetch(args).await,
        Commands::Features(args) => command::features(args),
    };

    match outcome {
        Ok(summary) => println!("{}", summary),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
