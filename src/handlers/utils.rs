use crate::config;
use crate::normalize::{parse_boolean_str, parse_number_str};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    /// Raw `limit`/`offset` query values; malformed values fall back to the
    /// defaults instead of rejecting the request.
    pub fn from_query(limit: Option<&str>, offset: Option<&str>) -> Self {
        let api = &config::config().api;
        Self::resolve(limit, offset, api.default_page_size, api.max_page_size)
    }

    fn resolve(limit: Option<&str>, offset: Option<&str>, default_size: i64, max_size: i64) -> Self {
        let limit = parse_number_str(limit, default_size as f64) as i64;
        let offset = parse_number_str(offset, 0.0) as i64;
        Self {
            limit: limit.clamp(1, max_size.max(1)),
            offset: offset.max(0),
        }
    }
}

/// Trimmed, non-empty filter value
pub fn filter_value(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Boolean filter; values that are not recognisably true or false mean
/// "no filter".
pub fn filter_flag(raw: &Option<String>) -> Option<bool> {
    let value = filter_value(raw)?;
    let as_true = parse_boolean_str(Some(value), true);
    (as_true == parse_boolean_str(Some(value), false)).then_some(as_true)
}

/// Integer id filter, ignored when malformed
pub fn filter_id(raw: &Option<String>) -> Option<i32> {
    filter_value(raw)?.parse().ok()
}
