pub mod aggregate;
pub mod cli;
pub mod columns;
pub mod data;
pub mod error;
pub mod filter;
pub mod io_utils;
pub mod report;
pub mod source;
pub mod window;
pub mod wow;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("chargeback_report", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Week(args) => report::execute_week(&args),
        Commands::Wow(args) => report::execute_wow(&args),
        Commands::Range(args) => report::execute_range(&args),
        Commands::Cumulative(args) => report::execute_cumulative(&args),
        Commands::Recent(args) => report::execute_recent(&args),
        Commands::Raw(args) => report::execute_raw(&args),
        Commands::Windows(args) => report::execute_windows(&args),
    }
}
