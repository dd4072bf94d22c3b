// src/lib.rs
pub mod a2s;
pub mod config;
pub mod error;
pub mod exporter;
pub mod handlers;
pub mod models;

use actix_web::web;
use handlers::index::IndexPage;

/// Registers the status endpoint and the landing page. Any path other than
/// the status path gets the landing page.
pub fn configure(cfg: &mut web::ServiceConfig, status_path: &str) {
    cfg.app_data(web::Data::new(IndexPage {
        status_path: status_path.to_string(),
    }))
    .route(status_path, web::route().to(handlers::status::get_status))
    .default_service(web::route().to(handlers::index::index));
}
