use std::path::Path;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::{Health, Message};

use crate::state::AppState;

pub mod auth;
pub mod contacts;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn route_not_found() -> (StatusCode, Json<Message>) {
    (StatusCode::NOT_FOUND, Json(Message::new("Route not found")))
}

/// Build the full application router: public auth routes, session-guarded
/// user routes, the contacts API, static avatars and Swagger docs.
pub fn build_router(cors: CorsLayer, state: AppState, avatars_dir: &Path) -> Router {
    let public_users = Router::new()
        .route("/api/users/register", post(auth::register))
        .route("/api/users/login", post(auth::login))
        .route("/api/users/verify/:verification_token", get(auth::verify_email))
        .route("/api/users/verify", post(auth::resend_verification));

    // Session-guarded routes: the middleware resolves the bearer token (or
    // auth_token cookie) to a user before any handler runs.
    let protected_users = Router::new()
        .route("/api/users/logout", post(auth::logout))
        .route("/api/users/current", get(auth::current))
        .route("/api/users/avatars", patch(auth::upload_avatar))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_session));

    let contacts = Router::new()
        .route("/api/contacts", get(contacts::list).post(contacts::create))
        .route(
            "/api/contacts/:id",
            get(contacts::get_one).put(contacts::update).delete(contacts::remove),
        );

    Router::new()
        .route("/health", get(health))
        .merge(public_users)
        .merge(protected_users)
        .merge(contacts)
        .nest_service("/avatars", ServeDir::new(avatars_dir))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi()))
        .fallback(route_not_found)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
