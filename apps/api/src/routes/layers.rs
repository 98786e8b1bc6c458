//! Transport layers wrapped around every route.

use std::any::Any;
use std::time::Duration;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::errors::AppError;

/// Tracing, CORS, a hard per-request deadline around the whole fetch → analyze pipeline,
/// and panic recovery. Deadline and panic failures answer in the same `{error, code}`
/// shape as handler errors.
pub fn with_layers(router: Router, request_timeout: Duration) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(middleware::from_fn(timeout_as_app_error))
            .layer(CatchPanicLayer::custom(panic_as_app_error))
            .layer(TimeoutLayer::new(request_timeout)),
    )
}

/// `TimeoutLayer` answers with an empty 408. No handler produces a 408 of its own.
async fn timeout_as_app_error(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return AppError::Timeout.into_response();
    }
    response
}

fn panic_as_app_error(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");

    AppError::Internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}
