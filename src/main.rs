mod app;
mod cli;
mod clock;
mod config;
mod db;
mod event;
mod export;
mod logging;
mod service;
mod summary;
mod tui;
mod types;
mod ui;
mod week;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, level_filters::LevelFilter};

use crate::{
    clock::SystemClock,
    config::Config,
    db::SqliteStorage,
    service::{MemoryStorage, Storage, TaskService},
};

fn main() -> Result<()> {
    let cli_opts = cli::Cli::parse();
    let config = Config::resolve(cli_opts.db.clone())?;
    logging::enable_logging(&config.log_dir, cli_opts.log.then_some(LevelFilter::TRACE))?;

    if cli_opts.in_memory {
        info!("Running without persistence");
        run(MemoryStorage::default(), cli_opts.command)
    } else {
        run(SqliteStorage::open(&config.db_path)?, cli_opts.command)
    }
}

fn run<S: Storage>(storage: S, command: Option<cli::Command>) -> Result<()> {
    let mut service = TaskService::new(storage, SystemClock)?;
    if let Some(command) = command {
        return cli::run(command, &mut service).inspect_err(|e| error!("Command failed: {e:?}"));
    }

    let mut app = app::App::new(service);
    let mut terminal = tui::init()?;
    let result = event::run(&mut app, &mut terminal);

    tui::restore()?;

    result.inspect_err(|e| error!("Event loop failed: {e:?}"))
}
