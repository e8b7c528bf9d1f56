use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{ProductRow, StaffLaboratoryRow, User};

/// Look up an active user by login email (case-insensitive)
pub async fn find_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password_hash, role, active, created_at, updated_at
         FROM users
         WHERE lower(email) = lower($1) AND active",
    )
    .bind(email.trim())
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// All staff/laboratory memberships, joined with laboratory names
pub async fn list_staff_affiliations(pool: &PgPool) -> Result<Vec<StaffLaboratoryRow>, DatabaseError> {
    let rows = sqlx::query_as::<_, StaffLaboratoryRow>(
        "SELECT sl.staff_id, sl.laboratory_id, l.slug AS laboratory_slug,
                l.name AS laboratory_name, sl.role
         FROM staff_laboratories sl
         JOIN laboratories l ON l.id = sl.laboratory_id
         ORDER BY sl.staff_id, sl.id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Published products attached to the given service centers, in display order
pub async fn list_center_products(pool: &PgPool, center_ids: &[i32]) -> Result<Vec<ProductRow>, DatabaseError> {
    if center_ids.is_empty() {
        return Ok(vec![]);
    }

    let rows = sqlx::query_as::<_, ProductRow>(
        "SELECT * FROM products
         WHERE service_center_id = ANY($1) AND published
         ORDER BY featured DESC, created_at DESC",
    )
    .bind(center_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
