mod support;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::Service;

use support::{body_json, build_app, json_request};

#[tokio::test]
async fn contact_crud_flow() -> anyhow::Result<()> {
    let mut t = build_app().await?;

    // Empty collection to start with
    let resp = t.app.call(Request::builder().uri("/api/contacts").body(Body::empty())?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!([]));

    // Create
    let resp = t
        .app
        .call(json_request(
            "POST",
            "/api/contacts",
            &json!({"name": "Jane", "email": "jane@x.com", "phone": "555-0100"}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["name"], "Jane");
    assert_eq!(created["email"], "jane@x.com");
    assert_eq!(created["phone"], "555-0100");

    // Fetch by id returns an equal record, list grew by one
    let resp = t
        .app
        .call(Request::builder().uri(format!("/api/contacts/{id}")).body(Body::empty())?)
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, created);
    let resp = t.app.call(Request::builder().uri("/api/contacts").body(Body::empty())?).await?;
    assert_eq!(body_json(resp).await.as_array().unwrap().len(), 1);

    // Partial update touches only the supplied field
    let resp = t
        .app
        .call(json_request("PUT", &format!("/api/contacts/{id}"), &json!({"phone": "555-0199"})))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["name"], "Jane");
    assert_eq!(updated["email"], "jane@x.com");
    assert_eq!(updated["phone"], "555-0199");

    // Delete returns the removed record and empties the collection
    let resp = t
        .app
        .call(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/contacts/{id}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["phone"], "555-0199");
    let resp = t.app.call(Request::builder().uri("/api/contacts").body(Body::empty())?).await?;
    assert_eq!(body_json(resp).await, json!([]));
    Ok(())
}

#[tokio::test]
async fn missing_contacts_are_404() -> anyhow::Result<()> {
    let mut t = build_app().await?;

    let resp = t
        .app
        .call(Request::builder().uri("/api/contacts/no-such-id").body(Body::empty())?)
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["message"], "Not found");

    let resp = t
        .app
        .call(
            Request::builder()
                .method("DELETE")
                .uri("/api/contacts/no-such-id")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = t
        .app
        .call(json_request("PUT", "/api/contacts/no-such-id", &json!({"name": "X"})))
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn contact_validation_rules() -> anyhow::Result<()> {
    let mut t = build_app().await?;

    // Creation requires all three fields to be valid
    let resp = t
        .app
        .call(json_request(
            "POST",
            "/api/contacts",
            &json!({"name": "Jane", "email": "not-an-email", "phone": "555-0100"}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = t
        .app
        .call(json_request("POST", "/api/contacts", &json!({"email": "jane@x.com"})))
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Update requires at least one field
    let resp = t
        .app
        .call(json_request(
            "POST",
            "/api/contacts",
            &json!({"name": "Jane", "email": "jane@x.com", "phone": "555-0100"}),
        ))
        .await?;
    let id = body_json(resp).await["id"].as_str().unwrap().to_string();

    let resp = t.app.call(json_request("PUT", &format!("/api/contacts/{id}"), &json!({}))).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["message"], "Body must have at least one field");

    // A bad field in the patch is rejected too
    let resp = t
        .app
        .call(json_request("PUT", &format!("/api/contacts/{id}"), &json!({"email": "nope"})))
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn non_json_body_is_a_bad_request_with_message() -> anyhow::Result<()> {
    let mut t = build_app().await?;

    let req = Request::builder()
        .method("POST")
        .uri("/api/contacts")
        .header("content-type", "application/json")
        .body(Body::from("{ definitely not json"))?;
    let resp = t.app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await["message"].is_string());
    Ok(())
}
