#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod api;
mod cli;
mod config;
mod core;
mod prelude;
mod render;
mod tables;

use std::io;

use clap::{Parser, crate_version};
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Args, Command},
    prelude::*,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .without_time()
        .compact()
        .with_writer(io::stderr)
        .init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Plan(args) => cli::plan(&args).await?,
        Command::Prices(args) => cli::prices(&args).await?,
        Command::Sensors(args) => cli::sensors(*args)?,
    }

    info!("done!");
    Ok(())
}

const DEFAULT_LOG_DIRECTIVES: &str = "info";

/// `RUST_LOG` directives, or [`DEFAULT_LOG_DIRECTIVES`] when unset or invalid.
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES))
}
