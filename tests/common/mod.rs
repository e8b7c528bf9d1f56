#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use campus_cms_api::auth::{generate_jwt, Claims};

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Drive the full router in-process. No listener and no database are
/// needed; handlers that reach for the pool degrade to 503.
pub async fn send(request: Request<Body>) -> Result<TestResponse> {
    let response = campus_cms_api::app()
        .oneshot(request)
        .await
        .context("router failed")?;

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    Ok(TestResponse { status, body })
}

pub async fn get(uri: &str, token: Option<&str>) -> Result<TestResponse> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    send(builder.body(Body::empty())?).await
}

pub async fn send_json(method: Method, uri: &str, token: Option<&str>, body: &Value) -> Result<TestResponse> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    send(builder.body(Body::from(body.to_string()))?).await
}

/// Signed token for a user with `role`
pub fn token_for(role: &str) -> Result<String> {
    let claims = Claims::new(Uuid::new_v4(), format!("{}@example.edu", role), role.to_string());
    Ok(generate_jwt(&claims)?)
}
