// Departments, laboratories and staff: the institutional directory.
use axum::{
    extract::{Path, Query},
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::{DepartmentRow, LaboratoryRow, StaffRow};
use crate::database::{list_staff_affiliations, DatabaseManager, Repository};
use crate::handlers::utils::filter_value;
use crate::middleware::{ApiResponse, ApiResult, RequestLocale};
use crate::normalize::{build_affiliation_index, transform_department, transform_laboratory, transform_staff};

#[derive(Debug, Default, Deserialize)]
pub struct LaboratoryListQuery {
    /// Department slug or id
    pub department: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StaffListQuery {
    pub department: Option<String>,
}

/// Resolve a department given either its numeric id or its slug
async fn department_id(raw: &str) -> Result<i32, crate::error::ApiError> {
    if let Ok(id) = raw.parse::<i32>() {
        return Ok(id);
    }
    let repository = Repository::<DepartmentRow>::new("departments", DatabaseManager::pool().await?)?;
    let department = repository
        .select_404(repository.query()?.where_eq("slug", raw), "Department")
        .await?;
    Ok(department.id)
}

/// GET /api/departments
pub async fn list_departments(Extension(locale): Extension<RequestLocale>) -> ApiResult<Value> {
    let repository = Repository::<DepartmentRow>::new("departments", DatabaseManager::pool().await?)?;
    let rows = repository.select_any(repository.query()?.order_by("id ASC")).await?;

    let ctx = locale.into_context();
    let departments: Vec<_> = rows
        .into_iter()
        .map(|row| transform_department(row, None, &ctx))
        .collect();
    Ok(ApiResponse::success(json!(departments)))
}

/// GET /api/departments/:slug - includes the department's laboratories
pub async fn show_department(
    Path(slug): Path<String>,
    Extension(locale): Extension<RequestLocale>,
) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let departments = Repository::<DepartmentRow>::new("departments", pool.clone())?;
    let row = departments
        .select_404(departments.query()?.where_eq("slug", slug.as_str()), "Department")
        .await?;

    let laboratories = Repository::<LaboratoryRow>::new("laboratories", pool)?;
    let labs = laboratories
        .select_any(
            laboratories
                .query()?
                .where_eq("department_id", row.id)
                .order_by("id ASC"),
        )
        .await?;

    let department = transform_department(row, Some(labs), &locale.into_context());
    Ok(ApiResponse::success(json!(department)))
}

/// GET /api/laboratories
pub async fn list_laboratories(
    Query(query): Query<LaboratoryListQuery>,
    Extension(locale): Extension<RequestLocale>,
) -> ApiResult<Value> {
    let repository = Repository::<LaboratoryRow>::new("laboratories", DatabaseManager::pool().await?)?;
    let mut builder = repository.query()?;
    if let Some(department) = filter_value(&query.department) {
        builder = builder.where_eq("department_id", department_id(department).await?);
    }
    let rows = repository.select_any(builder.order_by("id ASC")).await?;

    let ctx = locale.into_context();
    let labs: Vec<_> = rows.into_iter().map(|row| transform_laboratory(row, &ctx)).collect();
    Ok(ApiResponse::success(json!(labs)))
}

/// GET /api/laboratories/:slug
pub async fn show_laboratory(
    Path(slug): Path<String>,
    Extension(locale): Extension<RequestLocale>,
) -> ApiResult<Value> {
    let repository = Repository::<LaboratoryRow>::new("laboratories", DatabaseManager::pool().await?)?;
    let row = repository
        .select_404(repository.query()?.where_eq("slug", slug.as_str()), "Laboratory")
        .await?;

    Ok(ApiResponse::success(json!(transform_laboratory(row, &locale.into_context()))))
}

/// GET /api/staff - every staff member with laboratory affiliations
pub async fn list_staff(
    Query(query): Query<StaffListQuery>,
    Extension(locale): Extension<RequestLocale>,
) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let repository = Repository::<StaffRow>::new("staff", pool.clone())?;
    let mut builder = repository.query()?;
    if let Some(department) = filter_value(&query.department) {
        builder = builder.where_eq("department_id", department_id(department).await?);
    }
    let rows = repository.select_any(builder.order_by("id ASC")).await?;

    // Index built per request from the join rows
    let index = build_affiliation_index(&list_staff_affiliations(&pool).await?);

    let ctx = locale.into_context();
    let staff: Vec<_> = rows
        .into_iter()
        .map(|row| transform_staff(row, &index, &ctx))
        .collect();
    Ok(ApiResponse::success(json!(staff)))
}
