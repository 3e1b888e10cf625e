//! rmctl - CLI for the resource manager
//!
//! Managers create engineers, projects and capacity assignments; engineers
//! view their assignments and maintain their own profile. All state lives in
//! the backend REST API.

use anyhow::Result;
use clap::Parser;

mod client;
mod commands;
mod config;
mod error;
mod logging;
mod output;
mod resolve;
mod snapshot;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.log_level(), cli.log_format());

    // Run the command
    if let Err(e) = cli.run().await {
        // Print error in a user-friendly way
        error::print_error(&e);
        std::process::exit(1);
    }

    Ok(())
}
