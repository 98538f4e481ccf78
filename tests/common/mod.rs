#![allow(dead_code)]

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use campus_cms::auth::{issue_token, Claims};
use campus_cms::config::AppConfig;
use campus_cms::services::{EntityKind, Fields, Services};
use campus_cms::{app, AppState};

/// In-process app over the memory backend. Services are shared with the
/// router, so rows seeded here are visible to requests.
pub struct TestApp {
    pub router: Router,
    pub services: Services,
    pub config: AppConfig,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let config = AppConfig::development();
        let services = Services::memory();
        let router = app(AppState::new(services.clone(), &config));
        Self { router, services, config }
    }

    pub fn token(&self, role: &str) -> String {
        let claims = Claims::new(Uuid::new_v4(), format!("{}@escuela.edu.ar", role), role, 1).expect("claims");
        issue_token(&self.config.security.jwt_secret, &claims).expect("token")
    }

    pub fn admin_token(&self) -> String {
        self.token(&self.config.security.admin_role)
    }

    /// Stores a row directly, bypassing validation.
    pub async fn seed(&self, kind: EntityKind, row: Value) -> Result<Value> {
        let fields: Fields = serde_json::from_value(row)?;
        Ok(self.services.entity(kind).create(fields).await?)
    }

    pub async fn seed_deleted(&self, kind: EntityKind, row: Value) -> Result<Value> {
        let created = self.seed(kind, row).await?;
        let id = id_of(&created);
        Ok(self.services.entity(kind).soft_delete(id, Uuid::new_v4()).await?)
    }

    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok(TestResponse { status, body })
    }

    pub async fn get(&self, uri: &str) -> Result<TestResponse> {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn admin(&self, method: Method, uri: &str, body: Option<Value>) -> Result<TestResponse> {
        let token = self.admin_token();
        self.request(method, uri, Some(&token), body).await
    }
}

pub fn id_of(row: &Value) -> Uuid {
    row["id"].as_str().and_then(|s| s.parse().ok()).expect("row id")
}

/// Plain text of column `index` for every rendered row of an admin list.
pub fn column_text(list: &Value, index: usize) -> Vec<String> {
    list["data"]["table"]["body"]["rows"]
        .as_array()
        .map(|rows| {
            rows.iter()
                .map(|row| {
                    let cell = &row["cells"][index];
                    cell["text"].as_str().or_else(|| cell["label"].as_str()).unwrap_or_default().to_string()
                })
                .collect()
        })
        .unwrap_or_default()
}
