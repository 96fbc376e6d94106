#![warn(clippy::all, clippy::pedantic)]

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use clap::Parser;
use pinger::{HttpChecker, PingLog, Scheduler, SessionState};
use tracing::{info, warn};

mod cli;
mod config;
mod error;
mod routes;
mod state;

use cli::Cli;
use config::Config;
use error::AppError;
use logger::init_tracing;
use state::AppState;

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = Config::from_config(cli.config.as_ref())?;
    cli.apply(&mut config);

    if cli.print_config {
        print!("{config}");
        return Ok(());
    }

    init_tracing(config.logging.format);
    config.monitor.validate()?;

    let scheduler = Arc::new(build_scheduler(&config)?);
    if let Err(e) = scheduler.log().initialize().await {
        warn!("Ping log not initialized, retrying on first ping: {e}");
    }

    // Everything is wired up: the first pings can go out before we serve
    if config.monitor.autostart {
        scheduler.start().await;
    }

    let addr = SocketAddr::new(config.server.bind.parse::<IpAddr>()?, config.server.port);
    let state = web::Data::new(AppState {
        scheduler: Arc::clone(&scheduler),
        download_name: config.log.download_name.clone(),
    });

    let result = run_server(addr, state).await;
    scheduler.stop().await;
    result
}

fn build_scheduler(config: &Config) -> Result<Scheduler, AppError> {
    let checker = Arc::new(HttpChecker::new(config.monitor.timeout())?);
    let state = Arc::new(SessionState::new(config.monitor.targets.clone()));
    let log = Arc::new(PingLog::new(config.log.path.clone(), config.monitor.is_multi_target()));

    Ok(Scheduler::new(config.monitor.targets.clone(), config.monitor.interval(), checker, state, log))
}

async fn run_server(addr: SocketAddr, state: web::Data<AppState>) -> Result<(), AppError> {
    info!("Control API listening on http://{addr}");

    HttpServer::new(move || App::new().app_data(state.clone()).configure(routes::routes))
        .bind(addr)?
        .run()
        .await?;

    Ok(())
}
