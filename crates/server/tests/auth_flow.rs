mod support;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::Service;

use support::{authed_request, body_json, build_app, json_request, verification_token};

#[tokio::test]
async fn register_verify_login_current_logout_flow() -> anyhow::Result<()> {
    let mut t = build_app().await?;

    // Register
    let resp = t
        .app
        .call(json_request(
            "POST",
            "/api/users/register",
            &json!({"email": "Jane@X.com", "password": "Passw0rd!"}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["user"]["email"], "jane@x.com");
    assert_eq!(body["user"]["subscription"], "starter");
    assert!(body["user"]["avatarURL"]
        .as_str()
        .unwrap()
        .starts_with("https://www.gravatar.com/avatar/"));

    // Login is gated until the email is verified
    let resp = t
        .app
        .call(json_request(
            "POST",
            "/api/users/login",
            &json!({"email": "jane@x.com", "password": "Passw0rd!"}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["message"], "Please verify your email");

    // Verify with the token from the persisted record
    let token = verification_token(&t.users_file, "jane@x.com").await.unwrap();
    let resp = t
        .app
        .call(
            Request::builder()
                .uri(format!("/api/users/verify/{token}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["message"], "Verification successful");

    // The token is single-use
    let resp = t
        .app
        .call(
            Request::builder()
                .uri(format!("/api/users/verify/{token}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Login succeeds now and sets the session cookie
    let resp = t
        .app
        .call(json_request(
            "POST",
            "/api/users/login",
            &json!({"email": "jane@x.com", "password": "Passw0rd!"}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("set-cookie").is_some());
    let body = body_json(resp).await;
    let session = body["token"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["email"], "jane@x.com");

    // Current profile with the bearer token
    let resp = t.app.call(authed_request("GET", "/api/users/current", &session)).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["email"], "jane@x.com");

    // Logout invalidates the stored token
    let resp = t.app.call(authed_request("POST", "/api/users/logout", &session)).await?;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = t.app.call(authed_request("GET", "/api/users/current", &session)).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn duplicate_registration_conflicts() -> anyhow::Result<()> {
    let mut t = build_app().await?;

    let input = json!({"email": "jane@x.com", "password": "Passw0rd!"});
    let resp = t.app.call(json_request("POST", "/api/users/register", &input)).await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Same address, different case
    let resp = t
        .app
        .call(json_request(
            "POST",
            "/api/users/register",
            &json!({"email": "JANE@x.com", "password": "Passw0rd!"}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(resp).await["message"], "Email in use");
    Ok(())
}

#[tokio::test]
async fn short_password_rejected() -> anyhow::Result<()> {
    let mut t = build_app().await?;
    let resp = t
        .app
        .call(json_request(
            "POST",
            "/api/users/register",
            &json!({"email": "jane@x.com", "password": "short"}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn bad_credentials_share_one_message() -> anyhow::Result<()> {
    let mut t = build_app().await?;
    t.app
        .call(json_request(
            "POST",
            "/api/users/register",
            &json!({"email": "jane@x.com", "password": "Passw0rd!"}),
        ))
        .await?;
    let token = verification_token(&t.users_file, "jane@x.com").await.unwrap();
    t.app
        .call(Request::builder().uri(format!("/api/users/verify/{token}")).body(Body::empty())?)
        .await?;

    let resp = t
        .app
        .call(json_request(
            "POST",
            "/api/users/login",
            &json!({"email": "jane@x.com", "password": "wrong-pass"}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let wrong_pass = body_json(resp).await["message"].clone();

    let resp = t
        .app
        .call(json_request(
            "POST",
            "/api/users/login",
            &json!({"email": "nobody@x.com", "password": "Passw0rd!"}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let wrong_email = body_json(resp).await["message"].clone();

    assert_eq!(wrong_pass, wrong_email);
    assert_eq!(wrong_pass, "Email or password is wrong");
    Ok(())
}

#[tokio::test]
async fn resend_verification_rules() -> anyhow::Result<()> {
    let mut t = build_app().await?;

    // Missing email field
    let resp = t.app.call(json_request("POST", "/api/users/verify", &json!({}))).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["message"], "missing required field email");

    // Unknown user
    let resp = t
        .app
        .call(json_request("POST", "/api/users/verify", &json!({"email": "nobody@x.com"})))
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Registered user gets a fresh token on resend
    t.app
        .call(json_request(
            "POST",
            "/api/users/register",
            &json!({"email": "jane@x.com", "password": "Passw0rd!"}),
        ))
        .await?;
    let first = verification_token(&t.users_file, "jane@x.com").await.unwrap();
    let resp = t
        .app
        .call(json_request("POST", "/api/users/verify", &json!({"email": "jane@x.com"})))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let second = verification_token(&t.users_file, "jane@x.com").await.unwrap();
    assert_ne!(first, second);

    // Already verified accounts are rejected
    t.app
        .call(Request::builder().uri(format!("/api/users/verify/{second}")).body(Body::empty())?)
        .await?;
    let resp = t
        .app
        .call(json_request("POST", "/api/users/verify", &json!({"email": "jane@x.com"})))
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["message"], "Verification has already been passed");
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_session() -> anyhow::Result<()> {
    let mut t = build_app().await?;
    let resp = t
        .app
        .call(Request::builder().uri("/api/users/current").body(Body::empty())?)
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = t
        .app
        .call(authed_request("GET", "/api/users/current", "not-a-jwt"))
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_a_json_404() -> anyhow::Result<()> {
    let mut t = build_app().await?;
    let resp = t.app.call(Request::builder().uri("/api/nope").body(Body::empty())?).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["message"], "Route not found");
    Ok(())
}

#[tokio::test]
async fn avatar_upload_resizes_and_updates_profile() -> anyhow::Result<()> {
    let mut t = build_app().await?;

    // Register + verify + login
    t.app
        .call(json_request(
            "POST",
            "/api/users/register",
            &json!({"email": "jane@x.com", "password": "Passw0rd!"}),
        ))
        .await?;
    let token = verification_token(&t.users_file, "jane@x.com").await.unwrap();
    t.app
        .call(Request::builder().uri(format!("/api/users/verify/{token}")).body(Body::empty())?)
        .await?;
    let resp = t
        .app
        .call(json_request(
            "POST",
            "/api/users/login",
            &json!({"email": "jane@x.com", "password": "Passw0rd!"}),
        ))
        .await?;
    let session = body_json(resp).await["token"].as_str().unwrap().to_string();

    // Multipart upload of a small generated PNG
    let png = {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(32, 32));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png)?;
        out.into_inner()
    };
    let boundary = "XwireX";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"avatar\"; filename=\"me.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(&png);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let req = Request::builder()
        .method("PATCH")
        .uri("/api/users/avatars")
        .header("authorization", format!("Bearer {session}"))
        .header("content-type", format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))?;
    let resp = t.app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let url = body_json(resp).await["avatarURL"].as_str().unwrap().to_string();
    assert!(url.starts_with("/avatars/"));

    // File landed on disk at the fixed square size
    let file = t.avatars_dir.join(url.trim_start_matches("/avatars/"));
    let stored = image::open(&file)?;
    assert_eq!(stored.width(), 250);
    assert_eq!(stored.height(), 250);

    // Profile now points at the upload
    let resp = t.app.call(authed_request("GET", "/api/users/current", &session)).await?;
    assert_eq!(body_json(resp).await["avatarURL"], url);
    Ok(())
}

#[tokio::test]
async fn malformed_bodies_get_the_json_error_envelope() -> anyhow::Result<()> {
    let mut t = build_app().await?;

    // Missing required field
    let resp = t
        .app
        .call(json_request("POST", "/api/users/register", &json!({"email": "jane@x.com"})))
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("password"));

    let resp = t
        .app
        .call(json_request("POST", "/api/users/login", &json!({"password": "Passw0rd!"})))
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await["message"].as_str().unwrap().contains("email"));

    // Body that is not JSON at all
    let req = Request::builder()
        .method("POST")
        .uri("/api/users/verify")
        .header("content-type", "application/json")
        .body(Body::from("not json"))?;
    let resp = t.app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await["message"].is_string());
    Ok(())
}
