use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::JsonColumn;

/// Row of the `service_centers` table.
///
/// `products` is the legacy serialized product list kept from before
/// products had their own table; live products are loaded separately.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceCenterRow {
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub image: Option<String>,
    pub images: Option<JsonColumn>,
    pub equipments: Option<JsonColumn>,
    pub products: Option<JsonColumn>,
    pub working_hours: Option<JsonColumn>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
