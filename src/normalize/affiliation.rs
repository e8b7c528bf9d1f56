use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::database::models::StaffLaboratoryRow;

use super::locale::localized_from_text;

/// A staff member's membership in a laboratory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Affiliation {
    pub laboratory_id: i32,
    pub slug: String,
    /// Laboratory name, still locale-keyed; localized by the staff transformer.
    pub name: Value,
    pub role: Option<String>,
}

/// Group membership rows by staff id.
///
/// Built fresh from the rows passed in; row order is preserved within each
/// staff entry and repeated (staff, laboratory, role) triples are skipped.
pub fn build_affiliation_index(rows: &[StaffLaboratoryRow]) -> HashMap<i32, Vec<Affiliation>> {
    let mut index: HashMap<i32, Vec<Affiliation>> = HashMap::new();
    for row in rows {
        let entries = index.entry(row.staff_id).or_default();
        let duplicate = entries
            .iter()
            .any(|a| a.laboratory_id == row.laboratory_id && a.role == row.role);
        if duplicate {
            continue;
        }
        entries.push(Affiliation {
            laboratory_id: row.laboratory_id,
            slug: row.laboratory_slug.clone(),
            name: localized_from_text(Some(row.laboratory_name.as_str())),
            role: row.role.clone(),
        });
    }
    index
}
