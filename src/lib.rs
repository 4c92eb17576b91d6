pub mod cli;
pub mod component;
pub mod config;
pub mod data_dir;
pub mod error;
pub mod io_utils;
pub mod manifest;
pub mod state;
pub mod tables;
pub mod transform;

use std::{env, io, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::Cli,
    component::Component,
    config::{ConfigProvider, Configuration, KEY_DEBUG, flag},
    data_dir::DataDirectory,
};

static LOGGER: OnceLock<()> = OnceLock::new();

/// Installs the `env_logger` backend once. Without `RUST_LOG` the crate logs
/// at info; the backend itself accepts debug so the `debug` parameter can
/// raise the level after the configuration is read.
pub fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        let rust_log_set = env::var("RUST_LOG").is_ok();
        if !rust_log_set {
            builder.filter_module("csv_row_index", LevelFilter::Debug);
        }
        if builder.format_timestamp_millis().try_init().is_ok() && !rust_log_set {
            log::set_max_level(LevelFilter::Info);
        }
    });
}

fn enable_debug_logging() {
    if env::var("RUST_LOG").is_err() {
        log::set_max_level(LevelFilter::Debug);
    }
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let data = DataDirectory::new(cli.data_dir);
    info!("Using data directory {:?}", data.root());

    let config = Configuration::load(&data.config_path())?;
    if flag(config.parameters(), KEY_DEBUG) {
        enable_debug_logging();
        debug!("Debug logging enabled");
    }

    let component = Component::new(&config, &data, &data, &data);
    let stdout = io::stdout();
    let mut diagnostics = stdout.lock();
    component.execute_action(&mut diagnostics)?;
    Ok(())
}
