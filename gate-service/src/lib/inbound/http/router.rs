use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::antiforgery::AntiForgery;
use super::cookies::CookieTtls;
use super::handlers::health::health;
use super::handlers::home::show_home;
use super::handlers::login::show_login;
use super::handlers::login::submit_login;
use super::handlers::logout::submit_logout;
use super::handlers::register::show_register;
use super::handlers::register::submit_register;
use super::handlers::verify::show_verify;
use super::handlers::verify::submit_verify;
use super::middleware::identify;
use crate::flow::ports::AuthFlowPort;
use crate::session::ports::SessionIssuerPort;

/// Shared handler state.
///
/// The flow controller and session issuer sit behind their ports, so the
/// same router serves the Postgres-backed binary and the in-memory test
/// harness.
#[derive(Clone)]
pub struct AppState {
    pub flow: Arc<dyn AuthFlowPort>,
    pub sessions: Arc<dyn SessionIssuerPort>,
    pub antiforgery: Arc<AntiForgery>,
    pub cookie_ttls: CookieTtls,
}

pub fn create_router(
    flow: Arc<dyn AuthFlowPort>,
    sessions: Arc<dyn SessionIssuerPort>,
    antiforgery: Arc<AntiForgery>,
    cookie_ttls: CookieTtls,
) -> Router {
    let state = AppState {
        flow,
        sessions,
        antiforgery,
        cookie_ttls,
    };

    let pages = Router::new()
        .route("/", get(show_home))
        .route("/login", get(show_login))
        .route("/login", post(submit_login))
        .route("/login/verify", get(show_verify))
        .route("/login/verify", post(submit_verify))
        .route("/register", get(show_register))
        .route("/register", post(submit_register))
        .route("/logout", post(submit_logout))
        .route_layer(middleware::from_fn_with_state(state.clone(), identify));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(pages)
        .route("/health", get(health))
        .layer(trace_layer)
        .with_state(state)
}
