use axum::Extension;
use serde_json::{json, Value};

use crate::auth::EDITOR_ROLES;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/admin/whoami
pub async fn whoami(Extension(user): Extension<AuthUser>) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "id": user.user_id,
        "email": user.email,
        "role": user.role,
        "can_edit": EDITOR_ROLES.contains(&user.role.as_str()),
    })))
}
