//! Row → API representation for each entity kind.
//!
//! Rows keep structured values as serialized text. Each transformer decodes
//! those columns (lists fall back to `[]`, objects to `null`), localizes the
//! translatable fields when the caller asked for a locale and attaches
//! normalized equipment/product lists. Transformers never fail: bad data
//! degrades to the documented fallback and is logged.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::database::models::{
    DepartmentRow, JsonColumn, LaboratoryRow, ProductRow, ServiceCenterRow, ServiceRow, StaffRow,
};

use super::affiliation::Affiliation;
use super::coerce::decode_column;
use super::list::{normalize_list_report, ListItem};
use super::locale::{extract_localized_value, localize, localized_from_text, Locale, DEFAULT_LOCALE};

/// Per-request options for the transformers.
///
/// Without a locale, localized fields are returned as their raw locale
/// mapping (admin views edit every translation at once).
#[derive(Debug, Clone, Default)]
pub struct TransformContext {
    pub locale: Option<Locale>,
}

impl TransformContext {
    pub fn raw() -> Self {
        Self { locale: None }
    }

    pub fn localized(locale: Locale) -> Self {
        Self { locale: Some(locale) }
    }

    fn text(&self, raw: Option<&str>) -> Value {
        localize(localized_from_text(raw), self.locale.as_ref())
    }

    /// Locale for values that must end up as a single string.
    fn string_locale(&self) -> &str {
        self.locale.as_ref().map(Locale::as_str).unwrap_or(DEFAULT_LOCALE)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TransformError {
    #[error("product {0} has no usable name")]
    MissingName(i32),
}

#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: i32,
    pub slug: String,
    pub name: Value,
    pub description: Value,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub images: Value,
    pub tags: Value,
    pub features: Value,
    pub sizes: Value,
    pub specifications: Value,
    pub featured: bool,
    pub published: bool,
    pub service_center_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Service {
    pub id: i32,
    pub slug: String,
    pub name: Value,
    pub description: Value,
    pub category: Option<String>,
    pub icon: Option<String>,
    pub image: Option<String>,
    pub features: Value,
    pub equipments: Vec<ListItem>,
    pub service_center_id: Option<i32>,
    pub published: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceCenter {
    pub id: i32,
    pub slug: String,
    pub name: Value,
    pub description: Value,
    pub location: Value,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub image: Option<String>,
    pub images: Value,
    pub equipments: Vec<ListItem>,
    pub products: Vec<ListItem>,
    pub working_hours: Value,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Laboratory {
    pub id: i32,
    pub slug: String,
    pub name: Value,
    pub description: Value,
    pub department_id: Option<i32>,
    pub location: Value,
    pub image: Option<String>,
    pub images: Value,
    pub equipments: Vec<ListItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Department {
    pub id: i32,
    pub slug: String,
    pub name: Value,
    pub description: Value,
    pub image: Option<String>,
    pub head_name: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub laboratories: Option<Vec<Laboratory>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Staff {
    pub id: i32,
    pub slug: String,
    pub name: Value,
    pub title: Value,
    pub bio: Value,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub image: Option<String>,
    pub research_interests: Value,
    pub department_id: Option<i32>,
    pub affiliations: Vec<Affiliation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn transform_product(row: ProductRow, ctx: &TransformContext) -> Product {
    Product {
        name: ctx.text(Some(row.name.as_str())),
        description: ctx.text(row.description.as_deref()),
        images: list_column(row.images.as_ref(), "images"),
        tags: list_column(row.tags.as_ref(), "tags"),
        features: list_column(row.features.as_ref(), "features"),
        sizes: list_column(row.sizes.as_ref(), "sizes"),
        specifications: decode_column(row.specifications.as_ref(), json!([])),
        id: row.id,
        slug: row.slug,
        category: row.category,
        price: row.price,
        featured: row.featured,
        published: row.published,
        service_center_id: row.service_center_id,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

pub fn transform_service(row: ServiceRow, ctx: &TransformContext) -> Service {
    Service {
        name: ctx.text(Some(row.name.as_str())),
        description: ctx.text(row.description.as_deref()),
        features: list_column(row.features.as_ref(), "features"),
        equipments: item_column(row.equipments.as_ref(), "service", row.id),
        id: row.id,
        slug: row.slug,
        category: row.category,
        icon: row.icon,
        image: row.image,
        service_center_id: row.service_center_id,
        published: row.published,
        sort_order: row.sort_order,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

/// Service centers list their products from two places: the live
/// `products` table (`products_list`, already filtered to published rows by
/// the caller) and the legacy serialized `products` column. The live list
/// wins whenever it yields at least one item.
pub fn transform_service_center(
    row: ServiceCenterRow,
    products_list: Option<&[ProductRow]>,
    ctx: &TransformContext,
) -> ServiceCenter {
    let products = center_products(row.id, row.products.as_ref(), products_list, ctx);

    ServiceCenter {
        name: ctx.text(Some(row.name.as_str())),
        description: ctx.text(row.description.as_deref()),
        location: ctx.text(row.location.as_deref()),
        images: list_column(row.images.as_ref(), "images"),
        equipments: item_column(row.equipments.as_ref(), "service_center", row.id),
        working_hours: decode_column(row.working_hours.as_ref(), Value::Null),
        products,
        id: row.id,
        slug: row.slug,
        contact_email: row.contact_email,
        contact_phone: row.contact_phone,
        image: row.image,
        published: row.published,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

pub fn transform_laboratory(row: LaboratoryRow, ctx: &TransformContext) -> Laboratory {
    Laboratory {
        name: ctx.text(Some(row.name.as_str())),
        description: ctx.text(row.description.as_deref()),
        location: ctx.text(row.location.as_deref()),
        images: list_column(row.images.as_ref(), "images"),
        equipments: item_column(row.equipments.as_ref(), "laboratory", row.id),
        id: row.id,
        slug: row.slug,
        department_id: row.department_id,
        image: row.image,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

pub fn transform_department(
    row: DepartmentRow,
    laboratories: Option<Vec<LaboratoryRow>>,
    ctx: &TransformContext,
) -> Department {
    Department {
        name: ctx.text(Some(row.name.as_str())),
        description: ctx.text(row.description.as_deref()),
        head_name: ctx.text(row.head_name.as_deref()),
        laboratories: laboratories
            .map(|labs| labs.into_iter().map(|lab| transform_laboratory(lab, ctx)).collect()),
        id: row.id,
        slug: row.slug,
        image: row.image,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

pub fn transform_staff(
    row: StaffRow,
    affiliations: &HashMap<i32, Vec<Affiliation>>,
    ctx: &TransformContext,
) -> Staff {
    let affiliations = affiliations
        .get(&row.id)
        .map(|list| {
            list.iter()
                .map(|a| Affiliation {
                    name: localize(a.name.clone(), ctx.locale.as_ref()),
                    ..a.clone()
                })
                .collect()
        })
        .unwrap_or_default();

    Staff {
        name: ctx.text(Some(row.name.as_str())),
        title: ctx.text(row.title.as_deref()),
        bio: ctx.text(row.bio.as_deref()),
        research_interests: list_column(row.research_interests.as_ref(), "research_interests"),
        affiliations,
        id: row.id,
        slug: row.slug,
        email: row.email,
        phone: row.phone,
        image: row.image,
        department_id: row.department_id,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

/// Canonical list entry for a live product row.
pub fn product_to_list_item(row: &ProductRow, ctx: &TransformContext) -> Result<ListItem, TransformError> {
    let name = extract_localized_value(Some(&localized_from_text(Some(row.name.as_str()))), ctx.string_locale())
        .filter(|n| !n.trim().is_empty())
        .ok_or(TransformError::MissingName(row.id))?;

    let description = extract_localized_value(
        Some(&localized_from_text(row.description.as_deref())),
        ctx.string_locale(),
    );
    let image = match list_column(row.images.as_ref(), "images") {
        Value::Array(images) => images.iter().find_map(Value::as_str).map(str::to_string),
        _ => None,
    };
    let specifications = match decode_column(row.specifications.as_ref(), Value::Null) {
        Value::Null => None,
        decoded => Some(decoded),
    };

    Ok(ListItem {
        name,
        description,
        image,
        specifications,
    })
}

fn center_products(
    center_id: i32,
    legacy: Option<&JsonColumn>,
    live: Option<&[ProductRow]>,
    ctx: &TransformContext,
) -> Vec<ListItem> {
    if let Some(live) = live.filter(|rows| !rows.is_empty()) {
        let items: Vec<ListItem> = live
            .iter()
            .filter_map(|product| match product_to_list_item(product, ctx) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(center_id, error = %e, "skipping product in service center listing");
                    None
                }
            })
            .collect();
        if !items.is_empty() {
            return items;
        }
        tracing::warn!(center_id, "no live product could be transformed, using legacy product list");
    }
    item_column(legacy, "service_center", center_id)
}

/// Decode a list column; anything that is not an array becomes `[]`.
fn list_column(raw: Option<&JsonColumn>, field: &str) -> Value {
    match decode_column(raw, json!([])) {
        list @ Value::Array(_) => list,
        other => {
            tracing::warn!(field, kind = json_kind(&other), "expected a JSON array, using []");
            json!([])
        }
    }
}

fn item_column(raw: Option<&JsonColumn>, entity: &str, id: i32) -> Vec<ListItem> {
    let report = normalize_list_report(&decode_column(raw, json!([])));
    if report.skipped > 0 {
        tracing::debug!(entity, id, skipped = report.skipped, "dropped list items without a name");
    }
    report.items
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::StaffLaboratoryRow;
    use crate::normalize::affiliation::build_affiliation_index;

    fn ts() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z").unwrap().with_timezone(&Utc)
    }

    fn product(id: i32, name: &str) -> ProductRow {
        ProductRow {
            id,
            slug: format!("product-{}", id),
            name: name.to_string(),
            description: None,
            category: Some("kits".into()),
            price: Some(10.0),
            images: None,
            tags: None,
            features: None,
            sizes: None,
            specifications: None,
            featured: false,
            published: true,
            service_center_id: Some(1),
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn center(products: Option<&str>) -> ServiceCenterRow {
        ServiceCenterRow {
            id: 1,
            slug: "imaging".into(),
            name: r#"{"en":"Imaging Center","ar":"مركز التصوير"}"#.into(),
            description: Some("Plain description".into()),
            location: None,
            contact_email: Some("imaging@example.edu".into()),
            contact_phone: None,
            image: None,
            images: Some("not json".into()),
            equipments: Some(r#"[{"title":"MRI"},{"foo":1}]"#.into()),
            products: products.map(JsonColumn::from),
            working_hours: Some(r#"{"sun":"8-16"}"#.into()),
            published: true,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    #[test]
    fn product_columns_decode_to_native_structures() {
        let mut row = product(7, "Kit");
        row.images = Some(r#"["a.jpg","b.jpg"]"#.into());
        row.tags = None;
        row.specifications = Some(r#"{"weight":"2kg"}"#.into());

        let out = serde_json::to_value(transform_product(row, &TransformContext::raw())).unwrap();
        assert_eq!(out["images"], json!(["a.jpg", "b.jpg"]));
        assert_eq!(out["tags"], json!([]));
        assert_eq!(out["features"], json!([]));
        assert_eq!(out["sizes"], json!([]));
        assert_eq!(out["specifications"], json!({"weight": "2kg"}));
    }

    #[test]
    fn native_json_columns_pass_through() {
        let mut row = product(7, "Kit");
        row.images = Some(json!(["a.jpg", "b.jpg"]).into());
        row.tags = Some(json!(null).into());
        row.sizes = Some(json!({"s": 1}).into());
        row.specifications = Some(json!({"weight": "2kg"}).into());

        let out = transform_product(row.clone(), &TransformContext::raw());
        assert_eq!(out.images, json!(["a.jpg", "b.jpg"]));
        assert_eq!(out.tags, json!([]));
        assert_eq!(out.sizes, json!([]));
        assert_eq!(out.specifications, json!({"weight": "2kg"}));

        let item = product_to_list_item(&row, &TransformContext::raw()).unwrap();
        assert_eq!(item.image.as_deref(), Some("a.jpg"));
        assert_eq!(item.specifications, Some(json!({"weight": "2kg"})));
    }

    #[test]
    fn native_item_columns_are_normalized() {
        let mut row = center(None);
        row.equipments = Some(json!([{"title": "MRI", "details": "3T"}, {"foo": 1}]).into());
        row.products = Some(json!([{"name": "Scan"}]).into());
        row.working_hours = Some(json!({"sun": "8-16"}).into());

        let out = transform_service_center(row, None, &TransformContext::raw());
        assert_eq!(out.equipments.len(), 1);
        assert_eq!(out.equipments[0].description.as_deref(), Some("3T"));
        assert_eq!(out.products[0].name, "Scan");
        assert_eq!(out.working_hours, json!({"sun": "8-16"}));
    }

    #[test]
    fn region_locale_uses_primary_language() {
        let row = product(1, r#"{"en":"Kit","ar":"عدة"}"#);
        let ctx = TransformContext::localized("ar-EG".parse().unwrap());
        assert_eq!(transform_product(row, &ctx).name, json!("عدة"));
    }

    #[test]
    fn list_columns_reject_non_arrays() {
        let mut row = product(1, "Kit");
        row.tags = Some(r#"{"a":1}"#.into());
        row.sizes = Some("{broken".into());
        let out = transform_product(row, &TransformContext::raw());
        assert_eq!(out.tags, json!([]));
        assert_eq!(out.sizes, json!([]));
    }

    #[test]
    fn localizes_only_when_locale_given() {
        let mut row = product(1, r#"{"en":"Kit","ar":"عدة"}"#);
        row.description = Some("Only text".into());

        let raw = transform_product(row.clone(), &TransformContext::raw());
        assert_eq!(raw.name, json!({"en": "Kit", "ar": "عدة"}));

        let ar = transform_product(row, &TransformContext::localized("ar".parse().unwrap()));
        assert_eq!(ar.name, json!("عدة"));
        assert_eq!(ar.description, json!("Only text"));
    }

    #[test]
    fn center_prefers_live_products() {
        let legacy = r#"[{"name":"Legacy"}]"#;
        let live = vec![product(2, r#"{"en":"Live A"}"#), product(3, "Live B")];

        let out = transform_service_center(center(Some(legacy)), Some(live.as_slice()), &TransformContext::raw());
        let names: Vec<_> = out.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Live A", "Live B"]);
    }

    #[test]
    fn center_falls_back_to_legacy_products() {
        let legacy = r#"[{"name":"Legacy","details":"old"}]"#;

        let absent = transform_service_center(center(Some(legacy)), None, &TransformContext::raw());
        assert_eq!(absent.products[0].name, "Legacy");
        assert_eq!(absent.products[0].description.as_deref(), Some("old"));

        let empty = transform_service_center(center(Some(legacy)), Some(&[][..]), &TransformContext::raw());
        assert_eq!(empty.products[0].name, "Legacy");

        let broken = vec![product(4, "   ")];
        let failed = transform_service_center(center(Some(legacy)), Some(broken.as_slice()), &TransformContext::raw());
        assert_eq!(failed.products[0].name, "Legacy");
    }

    #[test]
    fn center_skips_only_failing_live_items() {
        let live = vec![product(2, ""), product(3, "Good")];
        let out = transform_service_center(center(None), Some(live.as_slice()), &TransformContext::raw());
        assert_eq!(out.products.len(), 1);
        assert_eq!(out.products[0].name, "Good");
    }

    #[test]
    fn center_decodes_its_own_columns() {
        let ctx = TransformContext::localized("ar".parse().unwrap());
        let out = transform_service_center(center(None), None, &ctx);
        assert_eq!(out.name, json!("مركز التصوير"));
        assert_eq!(out.images, json!([]));
        assert_eq!(out.working_hours, json!({"sun": "8-16"}));
        assert_eq!(out.equipments.len(), 1);
        assert_eq!(out.equipments[0].name, "MRI");
        assert!(out.products.is_empty());
        assert_eq!(out.location, Value::Null);
    }

    #[test]
    fn live_product_item_uses_first_image_and_locale() {
        let mut row = product(5, r#"{"en":"Scope","ar":"مجهر"}"#);
        row.images = Some(r#"["first.png","second.png"]"#.into());
        row.specifications = Some(r#"{"zoom":"40x"}"#.into());

        let item = product_to_list_item(&row, &TransformContext::localized("ar".parse().unwrap())).unwrap();
        assert_eq!(item.name, "مجهر");
        assert_eq!(item.image.as_deref(), Some("first.png"));
        assert_eq!(item.specifications, Some(json!({"zoom": "40x"})));

        let default = product_to_list_item(&row, &TransformContext::raw()).unwrap();
        assert_eq!(default.name, "Scope");

        assert_eq!(
            product_to_list_item(&product(9, "{}"), &TransformContext::raw()),
            Err(TransformError::MissingName(9))
        );
    }

    #[test]
    fn service_normalizes_equipment() {
        let row = ServiceRow {
            id: 3,
            slug: "sequencing".into(),
            name: "Sequencing".into(),
            description: None,
            category: None,
            icon: Some("dna".into()),
            image: None,
            features: Some(r#"["fast","cheap"]"#.into()),
            equipments: Some(r#"[{"name":"Sequencer","specifications":"{\"reads\":\"2x150\"}"},{"bad":true}]"#.into()),
            service_center_id: None,
            published: true,
            sort_order: 0,
            created_at: ts(),
            updated_at: ts(),
        };
        let out = serde_json::to_value(transform_service(row, &TransformContext::raw())).unwrap();
        assert_eq!(out["features"], json!(["fast", "cheap"]));
        assert_eq!(
            out["equipments"],
            json!([{"name": "Sequencer", "description": null, "image": null, "specifications": {"reads": "2x150"}}])
        );
        assert!(out.get("equipment").is_none());
    }

    #[test]
    fn staff_gets_localized_affiliations() {
        let staff = StaffRow {
            id: 1,
            slug: "dr-a".into(),
            name: r#"{"en":"Dr. A","ar":"د. أ"}"#.into(),
            title: None,
            bio: None,
            email: None,
            phone: None,
            image: None,
            research_interests: Some(r#"["optics"]"#.into()),
            department_id: None,
            created_at: ts(),
            updated_at: ts(),
        };
        let index = build_affiliation_index(&[StaffLaboratoryRow {
            staff_id: 1,
            laboratory_id: 4,
            laboratory_slug: "optics-lab".into(),
            laboratory_name: r#"{"en":"Optics Lab","ar":"مختبر البصريات"}"#.into(),
            role: Some("head".into()),
        }]);

        let out = transform_staff(staff, &index, &TransformContext::localized("ar".parse().unwrap()));
        assert_eq!(out.name, json!("د. أ"));
        assert_eq!(out.research_interests, json!(["optics"]));
        assert_eq!(out.affiliations[0].name, json!("مختبر البصريات"));
        assert_eq!(out.affiliations[0].role.as_deref(), Some("head"));
    }

    #[test]
    fn department_embeds_laboratories_when_loaded() {
        let dept = DepartmentRow {
            id: 2,
            slug: "physics".into(),
            name: "Physics".into(),
            description: None,
            image: None,
            head_name: None,
            created_at: ts(),
            updated_at: ts(),
        };
        let lab = LaboratoryRow {
            id: 4,
            slug: "optics-lab".into(),
            name: "Optics Lab".into(),
            description: None,
            department_id: Some(2),
            location: None,
            image: None,
            images: None,
            equipments: None,
            created_at: ts(),
            updated_at: ts(),
        };

        let bare = serde_json::to_value(transform_department(dept.clone(), None, &TransformContext::raw())).unwrap();
        assert!(bare.get("laboratories").is_none());

        let full = transform_department(dept, Some(vec![lab]), &TransformContext::raw());
        let labs = full.laboratories.unwrap();
        assert_eq!(labs[0].images, json!([]));
        assert!(labs[0].equipments.is_empty());
    }
}
