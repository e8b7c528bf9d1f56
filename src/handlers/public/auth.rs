use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{generate_jwt, verify_password, AuthError, Claims};
use crate::database::{find_user_by_email, DatabaseManager};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/login - exchange credentials for a JWT
pub async fn login(Json(payload): Json<LoginRequest>) -> ApiResult<Value> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let pool = DatabaseManager::pool().await?;
    let user = find_user_by_email(&pool, &payload.email).await?;

    // bcrypt verification blocks, so it runs off the async workers
    let matches = match &user {
        Some(user) => {
            let (password, stored) = (payload.password.clone(), user.password_hash.clone());
            tokio::task::spawn_blocking(move || verify_password(&password, &stored))
                .await
                .unwrap_or(false)
        }
        None => false,
    };

    let user = user
        .filter(|_| matches)
        .ok_or_else(|| {
            tracing::info!(email = %payload.email.trim(), "login rejected");
            AuthError::InvalidCredentials
        })?;

    let claims = Claims::new(user.id, user.email.clone(), user.role.clone());
    let token = generate_jwt(&claims)?;

    tracing::info!(user_id = %user.id, role = %user.role, "login succeeded");
    Ok(ApiResponse::success(json!({
        "token": token,
        "expires_at": claims.exp,
        "user": user,
    })))
}
