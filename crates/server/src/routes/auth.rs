use axum::{
    extract::{Multipart, Path, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use models::user::PublicUser;
use service::auth::domain::{LoginInput, RegisterInput};

use crate::errors::{ApiError, AppJson};
use crate::state::AppState;

const AUTH_COOKIE: &str = "auth_token";

/// Authenticated caller, injected by [`require_session`].
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

#[derive(Serialize)]
pub struct RegisterOutput {
    pub user: PublicUser,
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Deserialize)]
pub struct ResendInput {
    pub email: Option<String>,
}

#[derive(Serialize)]
pub struct AvatarOutput {
    #[serde(rename = "avatarURL")]
    pub avatar_url: String,
}

#[utoipa::path(post, path = "/api/users/register", tag = "users", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Email in use")))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterInput>,
) -> Result<(StatusCode, Json<RegisterOutput>), ApiError> {
    let user = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(RegisterOutput { user })))
}

#[utoipa::path(post, path = "/api/users/login", tag = "users", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged in"), (status = 401, description = "Bad credentials or unverified email")))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(input): AppJson<LoginInput>,
) -> Result<(CookieJar, Json<LoginOutput>), ApiError> {
    let session = state.auth.login(input).await?;

    let mut cookie = Cookie::new(AUTH_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    let jar = jar.add(cookie);

    Ok((jar, Json(LoginOutput { token: session.token, user: session.user })))
}

#[utoipa::path(post, path = "/api/users/logout", tag = "users", responses((status = 204, description = "Logged out"), (status = 401, description = "Not authorized")))]
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), ApiError> {
    state.auth.logout(user.id).await?;
    let jar = jar.remove(Cookie::from(AUTH_COOKIE));
    Ok((jar, StatusCode::NO_CONTENT))
}

#[utoipa::path(get, path = "/api/users/current", tag = "users", responses((status = 200, description = "Caller profile", body = PublicUser), (status = 401, description = "Not authorized")))]
pub async fn current(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<PublicUser>, ApiError> {
    Ok(Json(state.auth.current(user.id).await?))
}

#[utoipa::path(patch, path = "/api/users/avatars", tag = "users", responses((status = 200, description = "Avatar stored"), (status = 400, description = "Missing or invalid file"), (status = 401, description = "Not authorized")))]
pub async fn upload_avatar(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<Json<AvatarOutput>, ApiError> {
    let mut uploaded = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        if field.name() == Some("avatar") {
            uploaded = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(e.to_string()))?,
            );
            break;
        }
    }
    let Some(bytes) = uploaded else {
        return Err(ApiError::bad_request("missing required file field avatar"));
    };

    let url = state.avatars.store(user.id, bytes.to_vec()).await?;
    let avatar_url = state.auth.set_avatar(user.id, url).await?;
    Ok(Json(AvatarOutput { avatar_url }))
}

#[utoipa::path(get, path = "/api/users/verify/{verification_token}", tag = "users", params(("verification_token" = String, Path, description = "Single-use token from the verification mail")), responses((status = 200, description = "Verification successful"), (status = 404, description = "User not found")))]
pub async fn verify_email(
    State(state): State<AppState>,
    Path(verification_token): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.auth.verify_email(&verification_token).await?;
    Ok(Json(serde_json::json!({ "message": "Verification successful" })))
}

#[utoipa::path(post, path = "/api/users/verify", tag = "users", request_body = crate::openapi::ResendRequest, responses((status = 200, description = "Verification email sent"), (status = 400, description = "Missing email or already verified"), (status = 404, description = "User not found")))]
pub async fn resend_verification(
    State(state): State<AppState>,
    AppJson(input): AppJson<ResendInput>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(email) = input.email.filter(|e| !e.trim().is_empty()) else {
        return Err(ApiError::bad_request("missing required field email"));
    };
    state.auth.resend_verification(&email).await?;
    Ok(Json(serde_json::json!({ "message": "Verification email sent" })))
}

/// Guard for the session-scoped routes: resolves `Authorization: Bearer`
/// (with a cookie fallback) to a user and stashes it as a request
/// extension. Rejects tokens that are expired, unknown, or superseded by a
/// logout or newer login.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    let token = match bearer.or_else(|| jar.get(AUTH_COOKIE).map(|c| c.value().to_string())) {
        Some(t) if !t.is_empty() => t,
        _ => {
            warn!(path = %req.uri().path(), "missing Authorization header and auth_token cookie");
            return Err(ApiError::unauthorized());
        }
    };

    let user = state.auth.authenticate(&token).await?;
    req.extensions_mut()
        .insert(CurrentUser { id: user.id, email: user.email });
    Ok(next.run(req).await)
}
