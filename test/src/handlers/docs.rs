//! API documentation routes (public).
//!
//! Stand-ins for the springdoc endpoints: the Swagger UI page and the
//! OpenAPI document it loads.

use actix_web::http::header::LOCATION;
use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;

#[get("/swagger-ui.html")]
pub async fn swagger_ui_redirect() -> impl Responder {
    HttpResponse::Found()
        .insert_header((LOCATION, "/swagger-ui/index.html"))
        .finish()
}

#[get("/swagger-ui/{tail:.*}")]
pub async fn swagger_ui(tail: web::Path<String>) -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(format!(
            "<!DOCTYPE html><html><head><title>Swagger UI</title></head>\
             <body data-spec=\"/v3/api-docs\">{}</body></html>",
            tail.into_inner()
        ))
}

#[get("/v3/api-docs{tail:(?:/.*)?}")]
pub async fn api_docs() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "openapi": "3.0.1",
        "info": { "title": "Banking API", "version": "v1" },
        "paths": {
            "/accounts/{id}": { "get": { "summary": "Account details" } }
        }
    }))
}
