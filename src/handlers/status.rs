// src/handlers/status.rs
use actix_web::{web, HttpResponse};
use log::error;
use crate::error::StatusError;
use crate::exporter::Exporter;

/// One request, one upstream query. Failures are never answered with stale data.
pub async fn get_status(exporter: web::Data<Exporter>) -> Result<HttpResponse, StatusError> {
    let snapshot = exporter.poll().await.map_err(|e| {
        error!("error getting server info: {}", e);
        StatusError::from(e)
    })?;

    let body = serde_json::to_vec(&snapshot).map_err(|e| {
        error!("error encoding server info: {}", e);
        StatusError::from(e)
    })?;

    Ok(HttpResponse::Ok().content_type("application/json").body(body))
}
