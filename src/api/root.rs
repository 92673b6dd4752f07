use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse, Responder};
use std::io::ErrorKind;

use crate::models::RootResponse;
use crate::state::AppState;

pub async fn index(data: web::Data<AppState>) -> impl Responder {
    match &data.root {
        RootResponse::Text(message) => HttpResponse::Ok()
            .content_type(ContentType::plaintext())
            .body(message.clone()),
        RootResponse::StaticFile(path) => match tokio::fs::read(path).await {
            Ok(contents) => HttpResponse::Ok()
                .content_type(ContentType::html())
                .body(contents),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!("Static file not found: {}", path.display());
                HttpResponse::NotFound().finish()
            }
            Err(e) => {
                log::error!("Failed to read static file {}: {}", path.display(), e);
                HttpResponse::InternalServerError().finish()
            }
        },
    }
}
