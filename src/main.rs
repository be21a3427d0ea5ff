//! routes-swagger - command-line tool for generating Swagger documents from a route table.
//!
//! # Usage
//!
//! ```bash
//! routes-swagger --config <FILE> --routes <FILE> [OPTIONS]
//! ```
//!
//! # Examples
//!
//! Print the aggregate document:
//! ```bash
//! routes-swagger -c swagger.yml -r routes.json
//! ```
//!
//! Write one file per project and serve them:
//! ```bash
//! routes-swagger -c swagger.yml -r routes.json -d docs --serve 127.0.0.1:8080
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use routes_swagger::cli;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("routes-swagger starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args).await?;

    Ok(())
}
