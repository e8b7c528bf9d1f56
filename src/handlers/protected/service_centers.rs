use axum::{extract::Path, Extension, Json};
use serde_json::{json, Value};

use super::payload::{claim_slug, Columns, Payload};
use crate::database::models::ServiceCenterRow;
use crate::database::{list_center_products, DatabaseManager, Repository};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::normalize::{transform_service_center, TransformContext};

async fn repository() -> Result<Repository<ServiceCenterRow>, ApiError> {
    Ok(Repository::new("service_centers", DatabaseManager::pool().await?)?)
}

fn columns(payload: &Payload, slug: String) -> Result<Columns, ApiError> {
    Ok(vec![
        ("slug", slug.into()),
        ("name", payload.required_localized("name")?.into()),
        ("description", payload.localized("description")?.into()),
        ("location", payload.localized("location")?.into()),
        ("contact_email", payload.text("contact_email")?.into()),
        ("contact_phone", payload.text("contact_phone")?.into()),
        ("image", payload.text("image")?.into()),
        ("images", payload.list("images")?.into()),
        ("equipments", payload.items("equipments")?.into()),
        // legacy product list, shown only while no live products exist
        ("products", payload.items("products")?.into()),
        ("working_hours", payload.structured("working_hours")?.into()),
        ("published", payload.flag("published", false).into()),
    ])
}

/// Transform a written row the way the public endpoint will show it
async fn present(repository: &Repository<ServiceCenterRow>, row: ServiceCenterRow) -> Result<Value, ApiError> {
    let live = list_center_products(repository.pool(), &[row.id]).await?;
    Ok(json!(transform_service_center(row, Some(live.as_slice()), &TransformContext::raw())))
}

/// POST /api/admin/service-centers
pub async fn create(Extension(user): Extension<AuthUser>, Json(body): Json<Value>) -> ApiResult<Value> {
    let payload = Payload::try_from(body)?;
    let repository = repository().await?;
    let slug = claim_slug(&repository, &payload, None).await?;

    let row = repository.insert(&columns(&payload, slug)?).await?;
    tracing::info!(id = row.id, slug = %row.slug, by = %user.email, "service center created");

    Ok(ApiResponse::created(present(&repository, row).await?))
}

/// PUT /api/admin/service-centers/:id
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
    tracing::info!(id = row.id, slug = %row.slug, by = %user.email, "service center updated");

    Ok(ApiResponse::success(present(&repository, row).await?))
}

/// DELETE /api/admin/service-centers/:id
pub async fn delete(Extension(user): Extension<AuthUser>, Path(id): Path<i32>) -> ApiResult<()> {
    repository().await?.delete_by_id(id).await?;
    tracing::info!(id, by = %user.email, "service center deleted");
    Ok(ApiResponse::no_content())
}
