//! Shared harness for the HTTP flow and Diesel adapter suites.
#![allow(dead_code)]

pub mod embedded_postgres;

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use murmur::Trace;
use murmur::inbound::http::configure_api;
use murmur::test_support::{MutableClock, in_memory_http_state};
use serde_json::{Value, json};

pub const SESSION_COOKIE: &str = "session";

/// Initialise the full API over in-memory adapters driven by `clock`.
pub async fn api(
    clock: Arc<MutableClock>,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build();

    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(in_memory_http_state(clock)))
            .wrap(session)
            .wrap(Trace)
            .configure(configure_api),
    )
    .await
}

/// Log in with a demo identity token and return the session cookie.
pub async fn login(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    token: &str,
) -> Cookie<'static> {
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/session")
            .set_json(json!({ "token": token }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK, "login with {token}");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
        .expect("session cookie issued")
}

/// Send `req`, optionally authenticated, returning status and JSON body.
///
/// Empty bodies read as `Value::Null`.
pub async fn call(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    req: actix_test::TestRequest,
    cookie: Option<&Cookie<'static>>,
) -> (StatusCode, Value) {
    let req = match cookie {
        Some(cookie) => req.cookie(cookie.clone()),
        None => req,
    };
    let res = actix_test::call_service(app, req.to_request()).await;
    let status = res.status();
    let bytes = actix_test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}

pub async fn publish(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    cookie: &Cookie<'static>,
    content: &str,
) -> (StatusCode, Value) {
    call(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/posts")
            .set_json(json!({ "content": content })),
        Some(cookie),
    )
    .await
}
