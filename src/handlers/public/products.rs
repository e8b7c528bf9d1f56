use axum::{
    extract::{Path, Query},
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::ProductRow;
use crate::database::{DatabaseManager, Repository};
use crate::handlers::utils::{filter_flag, filter_value, Pagination};
use crate::middleware::{ApiResponse, ApiResult, RequestLocale};
use crate::normalize::transform_product;

#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub category: Option<String>,
    pub featured: Option<String>,
    pub search: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// GET /api/products - published products with optional filters
pub async fn list(
    Query(query): Query<ProductListQuery>,
    Extension(locale): Extension<RequestLocale>,
) -> ApiResult<Value> {
    let page = Pagination::from_query(query.limit.as_deref(), query.offset.as_deref());
    let repository = Repository::<ProductRow>::new("products", DatabaseManager::pool().await?)?;

    let mut builder = repository.query()?.where_eq("published", true);
    if let Some(category) = filter_value(&query.category) {
        builder = builder.where_eq("category", category);
    }
    if let Some(featured) = filter_flag(&query.featured) {
        builder = builder.where_eq("featured", featured);
    }
    if let Some(term) = filter_value(&query.search) {
        builder = builder.where_search(&["name", "description", "category", "tags"], term);
    }
    let builder = builder
        .order_by("featured DESC, created_at DESC, id DESC")
        .limit(page.limit)
        .offset(page.offset);

    let (rows, total) = repository.select_page(builder).await?;
    let ctx = locale.into_context();
    let products: Vec<_> = rows.into_iter().map(|row| transform_product(row, &ctx)).collect();

    Ok(ApiResponse::success(json!({
        "products": products,
        "total": total,
        "limit": page.limit,
        "offset": page.offset,
    })))
}

/// GET /api/products/:slug - one published product
pub async fn show(
    Path(slug): Path<String>,
    Extension(locale): Extension<RequestLocale>,
) -> ApiResult<Value> {
    let repository = Repository::<ProductRow>::new("products", DatabaseManager::pool().await?)?;
    let builder = repository
        .query()?
        .where_eq("slug", slug.as_str())
        .where_eq("published", true);
    let row = repository.select_404(builder, "Product").await?;

    let product = transform_product(row, &locale.into_context());
    Ok(ApiResponse::success(json!(product)))
}
