#![allow(dead_code)]

use std::path::PathBuf;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::Service;

use configs::{AppConfig, DatabaseConfig};

pub struct TestApp {
    pub router: Router,
    pub upload_dir: PathBuf,
    _tmp: TempDir,
}

pub fn test_config(upload_dir: &std::path::Path) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.database = DatabaseConfig::sqlite_memory();
    cfg.auth.jwt_secret = "test-secret".into();
    cfg.storage.upload_dir = upload_dir.to_string_lossy().into_owned();
    cfg
}

/// Full router over a fresh in-memory database and a temporary upload dir.
pub async fn spawn_app() -> anyhow::Result<TestApp> {
    let tmp = tempfile::tempdir()?;
    let upload_dir = tmp.path().join("documents");
    let state = server::startup::build_state(&test_config(&upload_dir)).await?;
    Ok(TestApp { router: server::startup::build_app(state), upload_dir, _tmp: tmp })
}

pub async fn read_json(resp: axum::response::Response) -> anyhow::Result<Value> {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned())))
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
        let resp = self.router.clone().call(req).await?;
        let status = resp.status();
        Ok((status, read_json(resp).await?))
    }

    pub async fn json(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        let req = match body {
            Some(b) => builder.header(header::CONTENT_TYPE, "application/json").body(Body::from(serde_json::to_vec(&b)?))?,
            None => builder.body(Body::empty())?,
        };
        self.send(req).await
    }

    /// Register and log in a user; returns `(id, token)`.
    pub async fn user(&self, email: &str, role: &str) -> anyhow::Result<(i64, String)> {
        let (status, body) = self
            .json("POST", "/users/register", None, Some(json!({"name": "Test User", "email": email, "password": "Secret123", "role": role})))
            .await?;
        assert_eq!(status, StatusCode::OK, "{body}");
        let id = body["id"].as_i64().unwrap_or_default();
        let (status, body) = self.json("POST", "/users/login", None, Some(json!({"email": email, "password": "Secret123"}))).await?;
        assert_eq!(status, StatusCode::OK, "{body}");
        Ok((id, body["access_token"].as_str().unwrap_or_default().to_string()))
    }

    /// Register and log in a mechanic; returns `(id, token)`.
    pub async fn mechanic(&self, login: &str, role: &str) -> anyhow::Result<(i64, String)> {
        let (status, body) = self
            .json(
                "POST",
                "/mechanics/register",
                None,
                Some(json!({
                    "name": "Test Mechanic",
                    "birth_date": "1985-05-20",
                    "login": login,
                    "password": "Password1",
                    "role": role,
                    "position": "Technician"
                })),
            )
            .await?;
        assert_eq!(status, StatusCode::OK, "{body}");
        let id = body["id"].as_i64().unwrap_or_default();
        let (status, body) = self.json("POST", "/mechanics/login", None, Some(json!({"login": login, "password": "Password1"}))).await?;
        assert_eq!(status, StatusCode::OK, "{body}");
        Ok((id, body["access_token"].as_str().unwrap_or_default().to_string()))
    }

    pub async fn car(&self, token: &str, plate: &str, vin: &str) -> anyhow::Result<i64> {
        let body = json!({"brand": "Toyota", "model": "Corolla", "year": 2019, "plate_number": plate, "vin": vin});
        let (status, body) = self.json("POST", "/cars/", Some(token), Some(body)).await?;
        assert_eq!(status, StatusCode::OK, "{body}");
        Ok(body["id"].as_i64().unwrap_or_default())
    }

    pub async fn catalog_entry(&self, admin_token: &str, name: &str, price: &str) -> anyhow::Result<i64> {
        let body = json!({"name": name, "description": "Standard", "price": price, "duration": 60});
        let (status, body) = self.json("POST", "/services/", Some(admin_token), Some(body)).await?;
        assert_eq!(status, StatusCode::OK, "{body}");
        Ok(body["id"].as_i64().unwrap_or_default())
    }
}
