// src/main.rs
use a2smon::a2s::{A2sClient, ServerQuery};
use a2smon::config::Config;
use a2smon::exporter::Exporter;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use env_logger::Env;
use log::{error, info};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::parse();

    env_logger::init_from_env(Env::default().default_filter_or(config.log_filter()));

    let server_address = config.server_address();
    let client = match A2sClient::new(&server_address, config.query_timeout()) {
        Ok(client) => client,
        Err(e) => {
            error!("error creating A2S client: {}", e);
            std::process::exit(1);
        }
    };
    info!("Monitoring A2S server at {}", client.server_addr());

    let client: Arc<dyn ServerQuery> = Arc::new(client);
    let exporter = web::Data::new(Exporter::new(client));

    let bind = config.bind_address();
    let status_path = config.status_path();

    info!("Starting server on {}, status at {}", bind, status_path);
    HttpServer::new(move || {
        App::new()
            .app_data(exporter.clone())
            .configure(|cfg| a2smon::configure(cfg, &status_path))
    })
        .bind(&bind)?
        .run().await
}
