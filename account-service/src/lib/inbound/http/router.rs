use std::sync::Arc;
use std::time::Duration;

use auth::JwtTokenService;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::get_account::get_account_me;
use super::handlers::login::login;
use super::handlers::login_session::login_session;
use super::handlers::register::register;
use super::handlers::verify_account::verify_account;
use super::middleware::authenticate as auth_middleware;
use crate::domain::account::service::AuthService;
use crate::outbound::repositories::PostgresAccountRepository;
use crate::outbound::repositories::PostgresSessionTokenRepository;
use crate::outbound::repositories::PostgresVerificationTokenRepository;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<
        AuthService<
            PostgresAccountRepository,
            PostgresVerificationTokenRepository,
            PostgresSessionTokenRepository,
        >,
    >,
    pub token_service: Arc<JwtTokenService>,
}

pub fn create_router(
    auth_service: Arc<
        AuthService<
            PostgresAccountRepository,
            PostgresVerificationTokenRepository,
            PostgresSessionTokenRepository,
        >,
    >,
    token_service: Arc<JwtTokenService>,
) -> Router {
    let state = AppState {
        auth_service,
        token_service,
    };

    let public_routes = Router::new()
        .route("/api/accounts", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/login/session", post(login_session))
        .route("/api/auth/verify", post(verify_account));

    let protected_routes = Router::new()
        .route("/api/accounts/me", get(get_account_me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
                headers = ?request.headers(),
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
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
