//! Authentication entry point tests.
//!
//! API clients get `401` with a Basic challenge instead of a redirect.

mod common;

use actix_web::http::header::WWW_AUTHENTICATE;
use actix_web::http::StatusCode;
use actix_web::test;

use common::{basic_auth, create_basic_app, session_cookie};

#[actix_web::test]
async fn test_no_auth_returns_401_with_challenge() {
    let app = create_basic_app().await;

    let req = test::TestRequest::get().uri("/accounts/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers().get(WWW_AUTHENTICATE).unwrap(),
        "Basic realm=\"Banking\""
    );
}

#[actix_web::test]
async fn test_wrong_password_returns_401() {
    let app = create_basic_app().await;

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header(("Authorization", basic_auth("teller", "wrongpassword")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_basic_auth_success() {
    let app = create_basic_app().await;

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header(("Authorization", basic_auth("teller", "teller")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("Welcome, teller!"));
}

#[actix_web::test]
async fn test_public_paths_unaffected() {
    let app = create_basic_app().await;

    for uri in ["/health", "/v3/api-docs", "/login"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
    }
}

#[actix_web::test]
async fn test_401_does_not_start_a_session() {
    let app = create_basic_app().await;

    let req = test::TestRequest::get().uri("/accounts/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie(&resp).is_none());
}
