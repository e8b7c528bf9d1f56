use axum::{
    extract::{Path, Query},
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::ServiceRow;
use crate::database::{DatabaseManager, Repository};
use crate::handlers::utils::{filter_id, filter_value, Pagination};
use crate::middleware::{ApiResponse, ApiResult, RequestLocale};
use crate::normalize::transform_service;

#[derive(Debug, Default, Deserialize)]
pub struct ServiceListQuery {
    pub category: Option<String>,
    pub service_center: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// GET /api/services
pub async fn list(
    Query(query): Query<ServiceListQuery>,
    Extension(locale): Extension<RequestLocale>,
) -> ApiResult<Value> {
    let page = Pagination::from_query(query.limit.as_deref(), query.offset.as_deref());
    let repository = Repository::<ServiceRow>::new("services", DatabaseManager::pool().await?)?;

    let mut builder = repository.query()?.where_eq("published", true);
    if let Some(category) = filter_value(&query.category) {
        builder = builder.where_eq("category", category);
    }
    if let Some(center_id) = filter_id(&query.service_center) {
        builder = builder.where_eq("service_center_id", center_id);
    }
    let builder = builder
        .order_by("sort_order ASC, id ASC")
        .limit(page.limit)
        .offset(page.offset);

    let (rows, total) = repository.select_page(builder).await?;
    let ctx = locale.into_context();
    let services: Vec<_> = rows.into_iter().map(|row| transform_service(row, &ctx)).collect();

    Ok(ApiResponse::success(json!({
        "services": services,
        "total": total,
        "limit": page.limit,
        "offset": page.offset,
    })))
}

/// GET /api/services/:slug
pub async fn show(
    Path(slug): Path<String>,
    Extension(locale): Extension<RequestLocale>,
) -> ApiResult<Value> {
    let repository = Repository::<ServiceRow>::new("services", DatabaseManager::pool().await?)?;
    let builder = repository
        .query()?
        .where_eq("slug", slug.as_str())
        .where_eq("published", true);
    let row = repository.select_404(builder, "Service").await?;

    Ok(ApiResponse::success(json!(transform_service(row, &locale.into_context()))))
}
