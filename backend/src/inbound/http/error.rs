//! Turns domain errors into murmur's JSON error responses.
//!
//! Every error response carries the request's `trace-id`. Throttled posts
//! also get `Retry-After`, and internal failures reach the client only as a
//! generic message.

use actix_web::http::StatusCode;
use actix_web::http::header::{CacheControl, CacheDirective, RETRY_AFTER};
use actix_web::{HttpResponse, HttpResponseBuilder, ResponseError};
use tracing::error;

pub use crate::domain::ApiResult;
use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

const INTERNAL_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Seconds a throttled client should wait, read from the error details.
fn retry_after_seconds(error: &Error) -> Option<u64> {
    if error.code() != ErrorCode::RateLimited {
        return None;
    }
    error
        .details()
        .and_then(|details| details.get("retryAfterSeconds"))
        .and_then(serde_json::Value::as_u64)
}

/// The body a client may see. Internal errors keep only their trace id.
fn public_body(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    error!(message = error.message(), trace_id = ?error.trace_id(), "internal error");
    match error.trace_id() {
        Some(id) => Error::internal(INTERNAL_MESSAGE).with_trace_id(id.to_owned()),
        None => Error::internal(INTERNAL_MESSAGE),
    }
}

fn insert_headers(builder: &mut HttpResponseBuilder, error: &Error) {
    builder.insert_header(CacheControl(vec![CacheDirective::NoStore]));
    if let Some(id) = error.trace_id() {
        builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
    }
    if let Some(seconds) = retry_after_seconds(error) {
        builder.insert_header((RETRY_AFTER, seconds.to_string()));
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        insert_headers(&mut builder, self);
        builder.json(public_body(self))
    }
}

// Extractor and framework failures that bypass the domain surface as 500s.
impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(INTERNAL_MESSAGE)
    }
}
