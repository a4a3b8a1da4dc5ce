mod support;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;

use service::auth::{PrincipalKind, TokenIssuer};
use support::spawn_app;

#[tokio::test]
async fn register_login_and_me() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (id, token) = app.user("ann@example.com", "customer").await?;

    let (status, me) = app.json("GET", "/users/me", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], id);
    assert_eq!(me["email"], "ann@example.com");
    assert_eq!(me["role"], "customer");
    assert!(me.get("password_hash").is_none());

    let (status, body) = app
        .json("POST", "/users/login", None, Some(json!({"email": "ann@example.com", "password": "Secret123"})))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    app.user("ann@example.com", "customer").await?;
    let (status, body) = app
        .json("POST", "/users/register", None, Some(json!({"name": "Ann", "email": "ann@example.com", "password": "Secret123"})))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Email already registered");
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_unauthorized() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    app.user("ann@example.com", "customer").await?;
    let req = Request::builder()
        .method("POST")
        .uri("/users/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&json!({"email": "ann@example.com", "password": "nope-nope"}))?))?;
    let (status, body) = app.send(req).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Incorrect email or password");

    let (status, body) = app
        .json("POST", "/mechanics/login", None, Some(json!({"login": "ghost", "password": "Password1"})))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Incorrect login or password");
    Ok(())
}

#[tokio::test]
async fn missing_or_garbage_token_is_rejected_with_challenge() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let req = Request::builder().uri("/users/me").body(Body::empty())?;
    let resp = tower::ServiceExt::oneshot(app.router.clone(), req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers()[header::WWW_AUTHENTICATE], "Bearer");

    let (status, body) = app.json("GET", "/users/me", Some("not.a.jwt"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Could not validate credentials");
    Ok(())
}

#[tokio::test]
async fn tokens_do_not_cross_identity_spaces() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (_, user_token) = app.user("ann@example.com", "customer").await?;
    let (_, mechanic_token) = app.mechanic("mike", "mechanic").await?;

    let (status, _) = app.json("GET", "/mechanics/me", Some(&user_token), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.json("GET", "/users/me", Some(&mechanic_token), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.json("GET", "/mechanics/me", Some(&mechanic_token), None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn expired_token_is_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (id, _) = app.user("ann@example.com", "customer").await?;
    let stale = TokenIssuer::new("test-secret", -5).issue(PrincipalKind::User, id as i32)?;
    let (status, _) = app.json("GET", "/users/me", Some(&stale.access_token), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn mechanic_login_reports_id_and_role() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (id, _) = app.mechanic("boss", "admin").await?;
    let (status, body) = app
        .json("POST", "/mechanics/login", None, Some(json!({"login": "boss", "password": "Password1"})))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mechanic_id"], id);
    assert_eq!(body["role"], "admin");
    Ok(())
}

#[tokio::test]
async fn underage_mechanic_cannot_register() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let body = json!({
        "name": "Kid", "birth_date": "2020-01-01", "login": "kid",
        "password": "Password1", "position": "Apprentice"
    });
    let (status, _) = app.json("POST", "/mechanics/register", None, Some(body)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn routes_are_also_served_under_api_prefix() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (_, token) = app.user("ann@example.com", "customer").await?;
    let (status, body) = app.json("GET", "/api/v1/users/me", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ann@example.com");

    let (status, body) = app.json("GET", "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let (status, body) = app.json("GET", "/", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to Car Service API");
    Ok(())
}
