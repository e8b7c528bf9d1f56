use axum::{extract::Path, Extension, Json};
use serde_json::{json, Value};

use super::payload::{claim_slug, Columns, Payload};
use crate::database::models::ServiceRow;
use crate::database::{DatabaseManager, Repository};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::normalize::{transform_service, TransformContext};

async fn repository() -> Result<Repository<ServiceRow>, ApiError> {
    Ok(Repository::new("services", DatabaseManager::pool().await?)?)
}

fn columns(payload: &Payload, slug: String) -> Result<Columns, ApiError> {
    Ok(vec![
        ("slug", slug.into()),
        ("name", payload.required_localized("name")?.into()),
        ("description", payload.localized("description")?.into()),
        ("category", payload.text("category")?.into()),
        ("icon", payload.text("icon")?.into()),
        ("image", payload.text("image")?.into()),
        ("features", payload.list("features")?.into()),
        ("equipments", payload.items("equipments")?.into()),
        ("service_center_id", payload.id_ref("service_center_id")?.into()),
        ("published", payload.flag("published", false).into()),
        ("sort_order", payload.id_ref("sort_order")?.unwrap_or(0).into()),
    ])
}

/// POST /api/admin/services
pub async fn create(Extension(user): Extension<AuthUser>, Json(body): Json<Value>) -> ApiResult<Value> {
    let payload = Payload::try_from(body)?;
    let repository = repository().await?;
    let slug = claim_slug(&repository, &payload, None).await?;

    let row = repository.insert(&columns(&payload, slug)?).await?;
    tracing::info!(id = row.id, slug = %row.slug, by = %user.email, "service created");

    Ok(ApiResponse::created(json!(transform_service(row, &TransformContext::raw()))))
}

/// PUT /api/admin/services/:id
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(body): Json<Value>,
) -> ApiResult<Value> {
    let payload = Payload::try_from(body)?;
    let repository = repository().await?;
    repository.select_by_id(id).await?;
    let slug = claim_slug(&repository, &payload, Some(id)).await?;

    let row = repository.update(id, &columns(&payload, slug)?).await?;
    tracing::info!(id = row.id, slug = %row.slug, by = %user.email, "service updated");

    Ok(ApiResponse::success(json!(transform_service(row, &TransformContext::raw()))))
}

/// DELETE /api/admin/services/:id
pub async fn delete(Extension(user): Extension<AuthUser>, Path(id): Path<i32>) -> ApiResult<()> {
    repository().await?.delete_by_id(id).await?;
    tracing::info!(id, by = %user.email, "service deleted");
    Ok(ApiResponse::no_content())
}
