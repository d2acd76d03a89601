use crate::app::App;
use crate::config::AppConfig;
use crate::db::connection::init_db;
use crate::router::respond;
use astra::Server;
use tracing::{error, info};

mod app;
mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod forms;
mod handlers;
mod logging;
mod mailer;
mod responses;
mod router;
mod storage;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    logging::init_logging("imovel_site=info");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let addr = config.bind_addr;
    let workers = config.max_workers;
    let schema_path = config.schema_path.clone();
    let app = App::new(config);

    if let Err(e) = init_db(&app.db, &schema_path) {
        error!(error = %e, "database initialization failed");
        std::process::exit(1);
    }
    if let Err(e) = app.store.ensure_root() {
        error!(error = %e, "upload directory unavailable");
        std::process::exit(1);
    }
    if app.mailer.is_none() {
        info!("BREVO_API_KEY not set; magic links will only be logged");
    }

    info!(%addr, workers, "starting server");

    let result = Server::bind(&addr)
        .max_workers(workers)
        .serve(move |req, _info| respond(req, &app));

    if let Err(e) = result {
        error!(error = %e, "server ended with error");
        std::process::exit(1);
    }

    info!("server shut down cleanly");
}
