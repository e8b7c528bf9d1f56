use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::JsonColumn;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StaffRow {
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub image: Option<String>,
    pub research_interests: Option<JsonColumn>,
    pub department_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One staff/laboratory membership, joined with the laboratory's name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StaffLaboratoryRow {
    pub staff_id: i32,
    pub laboratory_id: i32,
    pub laboratory_slug: String,
    pub laboratory_name: String,
    pub role: Option<String>,
}
