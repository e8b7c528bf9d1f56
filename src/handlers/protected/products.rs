use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::payload::{claim_slug, Columns, Payload};
use crate::database::models::ProductRow;
use crate::database::{DatabaseManager, Repository, SqlParam};
use crate::error::ApiError;
use crate::handlers::utils::{filter_flag, filter_value, Pagination};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::normalize::{transform_product, TransformContext};

#[derive(Debug, Default, Deserialize)]
pub struct AdminProductQuery {
    pub published: Option<String>,
    pub search: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

async fn repository() -> Result<Repository<ProductRow>, ApiError> {
    Ok(Repository::new("products", DatabaseManager::pool().await?)?)
}

fn columns(payload: &Payload, slug: String) -> Result<Columns, ApiError> {
    Ok(vec![
        ("slug", slug.into()),
        ("name", payload.required_localized("name")?.into()),
        ("description", payload.localized("description")?.into()),
        ("category", payload.text("category")?.into()),
        ("price", payload.price("price")?.into()),
        ("images", payload.list("images")?.into()),
        ("tags", payload.list("tags")?.into()),
        ("features", payload.list("features")?.into()),
        ("sizes", payload.list("sizes")?.into()),
        ("specifications", payload.structured("specifications")?.into()),
        ("featured", payload.flag("featured", false).into()),
        ("published", payload.flag("published", false).into()),
        ("service_center_id", SqlParam::Int(payload.id_ref("service_center_id")?)),
    ])
}

/// GET /api/admin/products - every product, drafts included
pub async fn list(Query(query): Query<AdminProductQuery>) -> ApiResult<Value> {
    let page = Pagination::from_query(query.limit.as_deref(), query.offset.as_deref());
    let repository = repository().await?;

    let mut builder = repository.query()?;
    if let Some(published) = filter_flag(&query.published) {
        builder = builder.where_eq("published", published);
    }
    if let Some(term) = filter_value(&query.search) {
        builder = builder.where_search(&["name", "slug", "category"], term);
    }
    let builder = builder
        .order_by("updated_at DESC, id DESC")
        .limit(page.limit)
        .offset(page.offset);

    let (rows, total) = repository.select_page(builder).await?;
    let ctx = TransformContext::raw();
    let products: Vec<_> = rows.into_iter().map(|row| transform_product(row, &ctx)).collect();

    Ok(ApiResponse::success(json!({
        "products": products,
        "total": total,
        "limit": page.limit,
        "offset": page.offset,
    })))
}

/// POST /api/admin/products
pub async fn create(Extension(user): Extension<AuthUser>, Json(body): Json<Value>) -> ApiResult<Value> {
    let payload = Payload::try_from(body)?;
    let repository = repository().await?;
    let slug = claim_slug(&repository, &payload, None).await?;

    let row = repository.insert(&columns(&payload, slug)?).await?;
    tracing::info!(id = row.id, slug = %row.slug, by = %user.email, "product created");

    Ok(ApiResponse::created(json!(transform_product(row, &TransformContext::raw()))))
}

/// PUT /api/admin/products/:id - full replacement
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
    tracing::info!(id = row.id, slug = %row.slug, by = %user.email, "product updated");

    Ok(ApiResponse::success(json!(transform_product(row, &TransformContext::raw()))))
}

/// DELETE /api/admin/products/:id
pub async fn delete(Extension(user): Extension<AuthUser>, Path(id): Path<i32>) -> ApiResult<()> {
    repository().await?.delete_by_id(id).await?;
    tracing::info!(id, by = %user.email, "product deleted");
    Ok(ApiResponse::no_content())
}
