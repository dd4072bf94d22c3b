// src/handlers/index.rs
use actix_web::{web, HttpResponse};

pub struct IndexPage {
    pub status_path: String,
}

pub async fn index(page: web::Data<IndexPage>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(format!(
            "<html>\n\
             <head><title>A2S Server Monitoring</title></head>\n\
             <body>\n\
             <h1>A2S Server Monitoring</h1>\n\
             <p><a href='{}'>Status</a></p>\n\
             </body>\n\
             </html>",
            page.status_path
        ))
}
