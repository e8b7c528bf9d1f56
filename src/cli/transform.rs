//! Offline transformer: feed rows exported from Postgres (for example with
//! `row_to_json`) through the same normalization the API uses.

use anyhow::Context;
use clap::ValueEnum;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

use crate::database::models::{
    DepartmentRow, LaboratoryRow, ProductRow, ServiceCenterRow, ServiceRow, StaffLaboratoryRow, StaffRow,
};
use crate::normalize::{
    build_affiliation_index, transform_department, transform_laboratory, transform_product, transform_service,
    transform_service_center, transform_staff, Locale, TransformContext,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntityKind {
    Product,
    Service,
    ServiceCenter,
    Laboratory,
    Department,
    Staff,
}

/// Transform one row or an array of rows.
///
/// Related data rides along on the row object: `products_list` (product
/// rows) for service centers, `laboratories` (laboratory rows) for
/// departments and `affiliations` (staff/laboratory join rows) for staff.
pub fn transform_document(kind: EntityKind, raw: &str, locale: Option<&str>) -> anyhow::Result<Value> {
    let ctx = match locale {
        Some(tag) => TransformContext::localized(tag.parse::<Locale>()?),
        None => TransformContext::raw(),
    };

    let document: Value = serde_json::from_str(raw).context("input is not valid JSON")?;
    match document {
        Value::Array(rows) => rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| transform_row(kind, row, &ctx).with_context(|| format!("row {}", i)))
            .collect::<anyhow::Result<Vec<_>>>()
            .map(Value::Array),
        row => transform_row(kind, row, &ctx),
    }
}

fn transform_row(kind: EntityKind, mut row: Value, ctx: &TransformContext) -> anyhow::Result<Value> {
    let value = match kind {
        EntityKind::Product => serde_json::to_value(transform_product(parse_row(row)?, ctx))?,
        EntityKind::Service => serde_json::to_value(transform_service(parse_row(row)?, ctx))?,
        EntityKind::ServiceCenter => {
            let live: Option<Vec<ProductRow>> = take_related(&mut row, "products_list")?;
            let center: ServiceCenterRow = parse_row(row)?;
            serde_json::to_value(transform_service_center(center, live.as_deref(), ctx))?
        }
        EntityKind::Laboratory => serde_json::to_value(transform_laboratory(parse_row::<LaboratoryRow>(row)?, ctx))?,
        EntityKind::Department => {
            let labs: Option<Vec<LaboratoryRow>> = take_related(&mut row, "laboratories")?;
            let department: DepartmentRow = parse_row(row)?;
            serde_json::to_value(transform_department(department, labs, ctx))?
        }
        EntityKind::Staff => {
            let links: Option<Vec<StaffLaboratoryRow>> = take_related(&mut row, "affiliations")?;
            let index = links
                .map(|links| build_affiliation_index(&links))
                .unwrap_or_else(HashMap::new);
            let staff: StaffRow = parse_row(row)?;
            serde_json::to_value(transform_staff(staff, &index, ctx))?
        }
    };
    Ok(value)
}

fn parse_row<T: DeserializeOwned>(row: Value) -> anyhow::Result<T> {
    serde_json::from_value(row).context("row does not match the table's columns")
}

fn take_related<T: DeserializeOwned>(row: &mut Value, key: &str) -> anyhow::Result<Option<T>> {
    let Some(related) = row.as_object_mut().and_then(|obj| obj.remove(key)) else {
        return Ok(None);
    };
    serde_json::from_value(related)
        .map(Some)
        .with_context(|| format!("'{}' has the wrong shape", key))
}
