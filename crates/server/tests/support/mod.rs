#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower_http::cors::CorsLayer;

use server::routes;
use server::state::AppState;
use service::auth::repo::file::FileUserRepository;
use service::auth::service::AuthConfig;
use service::auth::AuthService;
use service::avatar::AvatarStore;
use service::contacts::ContactStore;
use service::mail::NoopMailer;

pub struct TestApp {
    pub app: Router,
    pub users_file: PathBuf,
    pub contacts_file: PathBuf,
    pub avatars_dir: PathBuf,
}

/// Stand up the full router against a throwaway temp directory.
pub async fn build_app() -> anyhow::Result<TestApp> {
    let root = std::env::temp_dir().join(format!("contacts_api_test_{}", uuid::Uuid::new_v4()));
    tokio::fs::create_dir_all(&root).await?;
    let users_file = root.join("users.json");
    let contacts_file = root.join("contacts.json");
    let avatars_dir = root.join("avatars");

    let users = FileUserRepository::new(&users_file)
        .await
        .map_err(|e| anyhow::anyhow!("users store: {e}"))?;
    let auth = Arc::new(AuthService::new(
        users,
        Arc::new(NoopMailer),
        AuthConfig::new("test-secret", 3600, "http://localhost:3000"),
    ));
    let state = AppState {
        auth,
        contacts: ContactStore::new(&contacts_file),
        avatars: AvatarStore::new(&avatars_dir),
    };
    let app = routes::build_router(CorsLayer::very_permissive(), state, &avatars_dir);
    Ok(TestApp { app, users_file, contacts_file, avatars_dir })
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub fn authed_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(resp: Response<axum::body::Body>) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

/// Pull a user's current verification token straight out of the persisted
/// users document, the way the mail link would carry it.
pub async fn verification_token(users_file: &Path, email: &str) -> Option<String> {
    let bytes = tokio::fs::read(users_file).await.ok()?;
    let map: Value = serde_json::from_slice(&bytes).ok()?;
    map.get(email)?
        .get("verification_token")?
        .as_str()
        .map(str::to_string)
}
