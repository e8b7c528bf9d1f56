use axum::{extract::Path, Extension};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::database::models::{ProductRow, ServiceCenterRow};
use crate::database::{list_center_products, DatabaseManager, Repository};
use crate::middleware::{ApiResponse, ApiResult, RequestLocale};
use crate::normalize::transform_service_center;

/// Live products grouped by their service center, keeping query order
fn group_by_center(products: Vec<ProductRow>) -> HashMap<i32, Vec<ProductRow>> {
    let mut grouped: HashMap<i32, Vec<ProductRow>> = HashMap::new();
    for product in products {
        if let Some(center_id) = product.service_center_id {
            grouped.entry(center_id).or_default().push(product);
        }
    }
    grouped
}

/// GET /api/service-centers
pub async fn list(Extension(locale): Extension<RequestLocale>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let repository = Repository::<ServiceCenterRow>::new("service_centers", pool.clone())?;
    let builder = repository
        .query()?
        .where_eq("published", true)
        .order_by("id ASC");
    let rows = repository.select_any(builder).await?;

    let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
    let products = group_by_center(list_center_products(&pool, &ids).await?);

    let ctx = locale.into_context();
    let centers: Vec<_> = rows
        .into_iter()
        .map(|row| {
            let live = products.get(&row.id).map(Vec::as_slice);
            transform_service_center(row, live, &ctx)
        })
        .collect();

    Ok(ApiResponse::success(json!(centers)))
}

/// GET /api/service-centers/:slug
pub async fn show(
    Path(slug): Path<String>,
    Extension(locale): Extension<RequestLocale>,
) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let repository = Repository::<ServiceCenterRow>::new("service_centers", pool.clone())?;
    let builder = repository
        .query()?
        .where_eq("slug", slug.as_str())
        .where_eq("published", true);
    let row = repository.select_404(builder, "Service center").await?;

    let live = list_center_products(&pool, &[row.id]).await?;
    let center = transform_service_center(row, Some(live.as_slice()), &locale.into_context());

    Ok(ApiResponse::success(json!(center)))
}
