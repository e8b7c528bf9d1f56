use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::JsonColumn;

/// Row of the `products` table. `name` and `description` hold localized
/// text; `images`, `tags`, `features`, `sizes` and `specifications` hold
/// JSON, serialized to text or stored natively.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProductRow {
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub images: Option<JsonColumn>,
    pub tags: Option<JsonColumn>,
    pub features: Option<JsonColumn>,
    pub sizes: Option<JsonColumn>,
    pub specifications: Option<JsonColumn>,
    pub featured: bool,
    pub published: bool,
    pub service_center_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
