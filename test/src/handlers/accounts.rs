//! Account routes (authenticated).

use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;

use banking_security_core::http::security::AuthenticatedUser;

#[derive(Serialize)]
struct Account {
    id: u64,
    owner: String,
    currency: &'static str,
}

#[get("/")]
pub async fn home(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().body(format!("Welcome, {}!", user.get_username()))
}

#[get("/accounts/{id}")]
pub async fn account(user: AuthenticatedUser, id: web::Path<u64>) -> impl Responder {
    HttpResponse::Ok().json(Account {
        id: id.into_inner(),
        owner: user.get_username().to_string(),
        currency: "EUR",
    })
}
