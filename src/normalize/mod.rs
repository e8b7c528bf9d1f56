//! Normalization layer between stored rows and API responses.

pub mod affiliation;
pub mod coerce;
pub mod list;
pub mod locale;
pub mod slug;
pub mod transform;

pub use affiliation::{build_affiliation_index, Affiliation};
pub use coerce::{
    decode_as, decode_column, decode_text, encode_json_column, parse_boolean, parse_boolean_str, parse_json_value,
    parse_number, parse_number_str,
};
pub use list::{normalize_list_items, normalize_list_report, ListItem, NormalizedList};
pub use locale::{extract_localized_value, localize, localized_from_text, Locale, DEFAULT_LOCALE};
pub use slug::{resolve_slug, slugify};
pub use transform::{
    transform_department, transform_laboratory, transform_product, transform_service,
    transform_service_center, transform_staff, TransformContext,
};
