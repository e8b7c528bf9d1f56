//! Write-side validation for admin payloads.
//!
//! Admin clients send decoded JSON (locale maps as objects, lists as
//! arrays). Columns store localized and structured values as serialized
//! text, so every accepted field is checked here and encoded into the
//! column representation the read path decodes.

use serde_json::{Map, Value};
use sqlx::{postgres::PgRow, FromRow};

use crate::database::{Repository, SqlParam};
use crate::error::ApiError;
use crate::normalize::{
    encode_json_column, extract_localized_value, normalize_list_report, parse_boolean, parse_json_value,
    parse_number, resolve_slug, Locale, DEFAULT_LOCALE,
};

/// Body of a create/update request
#[derive(Debug)]
pub struct Payload(Map<String, Value>);

impl TryFrom<Value> for Payload {
    type Error = ApiError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Payload(map)),
            _ => Err(ApiError::bad_request("Request body must be a JSON object")),
        }
    }
}

impl Payload {
    fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|v| !v.is_null())
    }

    /// Localized text: a plain string or a `{locale: string}` mapping.
    pub fn localized(&self, field: &str) -> Result<Option<String>, ApiError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(value @ Value::Object(map)) => {
                for (key, text) in map {
                    if key.parse::<Locale>().is_err() {
                        return Err(ApiError::invalid_field(field, format!("'{}' is not a locale tag", key)));
                    }
                    if !text.is_string() {
                        return Err(ApiError::invalid_field(field, format!("translation '{}' must be a string", key)));
                    }
                }
                if map.is_empty() {
                    return Ok(None);
                }
                Ok(Some(value.to_string()))
            }
            Some(_) => Err(ApiError::invalid_field(field, "must be a string or a locale mapping")),
        }
    }

    pub fn required_localized(&self, field: &str) -> Result<String, ApiError> {
        self.localized(field)?
            .ok_or_else(|| ApiError::invalid_field(field, "is required"))
    }

    pub fn text(&self, field: &str) -> Result<Option<String>, ApiError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.trim().to_string()).filter(|s| !s.is_empty())),
            Some(_) => Err(ApiError::invalid_field(field, "must be a string")),
        }
    }

    /// List column; string-encoded arrays are accepted too.
    pub fn list(&self, field: &str) -> Result<Option<String>, ApiError> {
        match parse_json_value(self.get(field), Value::Null) {
            Value::Null => Ok(None),
            value @ Value::Array(_) => Ok(encode_json_column(Some(&value))),
            _ => Err(ApiError::invalid_field(field, "must be an array")),
        }
    }

    /// Object column (or list, for `specifications` which may be either)
    pub fn structured(&self, field: &str) -> Result<Option<String>, ApiError> {
        match parse_json_value(self.get(field), Value::Null) {
            Value::Null => Ok(None),
            value @ (Value::Object(_) | Value::Array(_)) => Ok(encode_json_column(Some(&value))),
            _ => Err(ApiError::invalid_field(field, "must be an object or an array")),
        }
    }

    /// Equipment/product items, stored in canonical form. Unlike reads,
    /// writes reject unnamed items instead of dropping them.
    pub fn items(&self, field: &str) -> Result<Option<String>, ApiError> {
        let raw = parse_json_value(self.get(field), Value::Null);
        if raw.is_null() {
            return Ok(None);
        }
        if !raw.is_array() {
            return Err(ApiError::invalid_field(field, "must be an array"));
        }

        let report = normalize_list_report(&raw);
        if report.skipped > 0 {
            return Err(ApiError::invalid_field(
                field,
                format!("{} item(s) have no name or title", report.skipped),
            ));
        }
        let encoded = serde_json::to_value(&report.items)
            .map_err(|e| ApiError::internal_server_error(format!("failed to encode {}: {}", field, e)))?;
        Ok(encode_json_column(Some(&encoded)))
    }

    /// Non-negative number; `null`/absent is no value.
    pub fn price(&self, field: &str) -> Result<Option<f64>, ApiError> {
        let Some(value) = self.get(field) else { return Ok(None) };
        if value.as_str().is_some_and(|s| s.trim().is_empty()) {
            return Ok(None);
        }
        let price = parse_number(Some(value), f64::NAN);
        if price.is_nan() {
            return Err(ApiError::invalid_field(field, "must be a number"));
        }
        if price < 0.0 {
            return Err(ApiError::invalid_field(field, "must not be negative"));
        }
        Ok(Some(price))
    }

    pub fn flag(&self, field: &str, fallback: bool) -> bool {
        parse_boolean(self.get(field), fallback)
    }

    /// Integer reference to another row
    pub fn id_ref(&self, field: &str) -> Result<Option<i32>, ApiError> {
        let Some(value) = self.get(field) else { return Ok(None) };
        let n = parse_number(Some(value), f64::NAN);
        if n.fract() != 0.0 || n.is_nan() || n < i32::MIN as f64 || n > i32::MAX as f64 {
            return Err(ApiError::invalid_field(field, "must be an integer"));
        }
        Ok(Some(n as i32))
    }

    /// The explicit `slug`, slugified, or one derived from `name`.
    pub fn slug(&self) -> Result<String, ApiError> {
        let explicit = self.text("slug")?;
        let name = self
            .get("name")
            .and_then(|name| extract_localized_value(Some(name), DEFAULT_LOCALE))
            .unwrap_or_default();

        resolve_slug(explicit.as_deref(), &name)
            .ok_or_else(|| ApiError::invalid_field("slug", "must contain at least one letter or digit"))
    }
}

/// Resolve the payload's slug and make sure no other row holds it.
/// The unique index still guards the race between check and write.
pub async fn claim_slug<T>(
    repository: &Repository<T>,
    payload: &Payload,
    exclude_id: Option<i32>,
) -> Result<String, ApiError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let slug = payload.slug()?;
    if repository.slug_taken(&slug, exclude_id).await? {
        return Err(ApiError::conflict(format!("Slug '{}' is already in use", slug)));
    }
    Ok(slug)
}

/// Shorthand for the column list handed to the repository
pub type Columns = Vec<(&'static str, SqlParam)>;
