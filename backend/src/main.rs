mod bootstrap;
mod config;
mod error;
mod services;
mod state;
mod store;
mod uploads;

use crate::config::Config;
use crate::state::AppState;
use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::{error, info};
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;
    bootstrap::ensure_layout(&config)?;

    // One state for all workers: the store lock must be shared.
    let state = web::Data::new(AppState::from_config(&config));
    let origins = config.allowed_origins.clone();

    info!(
        "Server running on http://{}:{} (data: {}, uploads: {})",
        config.host,
        config.port,
        config.data_file.display(),
        config.uploads_dir.display()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(cors(&origins))
            .wrap(Logger::default())
            .configure(services::configure(state.clone()))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

/// Only the configured frontends may call the API, with credentials.
fn cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allow_any_header()
        .supports_credentials()
}
