pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod engine;
pub mod errors;
pub mod notify;
pub mod rating;
pub mod services;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use cli::Cli;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_sweep() -> Result<()> {
    let config = AppConfig::new();
    let pool = database::create_pool(&database::database_path())?;
    let mut conn = database::get_connection(&pool)?;

    let report = engine::sweep(&mut conn, Utc::now().naive_utc(), &config.rating)?;
    log::info!(
        "Sweep finished: {} confirmed, {} failed, {} checked",
        report.confirmed_count,
        report.failed_count,
        report.total_checked
    );
    Ok(())
}

pub fn handle_init() -> Result<()> {
    let pool = database::create_pool(&database::database_path())?;
    let mut conn = database::get_connection(&pool)?;
    database::setup::reset_database(&mut conn)
}

pub fn handle_seed() -> Result<()> {
    let config = AppConfig::new();
    let pool = database::create_pool(&database::database_path())?;
    let conn = database::get_connection(&pool)?;
    services::seed::seed_players(&conn, &config)?;
    Ok(())
}
