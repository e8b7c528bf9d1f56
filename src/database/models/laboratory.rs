use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::JsonColumn;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LaboratoryRow {
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub department_id: Option<i32>,
    pub location: Option<String>,
    pub image: Option<String>,
    pub images: Option<JsonColumn>,
    pub equipments: Option<JsonColumn>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
