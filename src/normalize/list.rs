use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::coerce::parse_json_value;

/// Canonical equipment/product entry as returned to API consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub specifications: Option<Value>,
}

/// Normalized items plus the number of entries that were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedList {
    pub items: Vec<ListItem>,
    pub skipped: usize,
}

/// Normalize a decoded equipment/product list into canonical items.
///
/// Non-arrays produce an empty list. Items without a usable `name`/`title`
/// are dropped; the rest keep their relative order.
pub fn normalize_list_items(raw: &Value) -> Vec<ListItem> {
    normalize_list_report(raw).items
}

pub fn normalize_list_report(raw: &Value) -> NormalizedList {
    let Value::Array(entries) = raw else {
        return NormalizedList::default();
    };

    let mut out = NormalizedList {
        items: Vec::with_capacity(entries.len()),
        skipped: 0,
    };
    for entry in entries {
        match entry.as_object().and_then(normalize_item) {
            Some(item) => out.items.push(item),
            None => out.skipped += 1,
        }
    }
    out
}

fn normalize_item(obj: &Map<String, Value>) -> Option<ListItem> {
    let name = non_blank(obj, "name").or_else(|| non_blank(obj, "title"))?;

    let description = string_field(obj, "details").or_else(|| string_field(obj, "description"));
    let image = string_field(obj, "image");
    let specifications = match parse_json_value(obj.get("specifications"), Value::Null) {
        Value::Null => None,
        decoded => Some(decoded),
    };

    Some(ListItem {
        name,
        description,
        image,
        specifications,
    })
}

fn non_blank(obj: &Map<String, Value>, key: &str) -> Option<String> {
    string_field(obj, key).filter(|s| !s.trim().is_empty())
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn drops_invalid_items_and_keeps_order() {
        let input = json!([{"title": "A"}, {"foo": "bad"}, {"name": "B", "details": "d"}]);
        let items = normalize_list_items(&input);
        assert_eq!(
            serde_json::to_value(&items).unwrap(),
            json!([
                {"name": "A", "description": null, "image": null, "specifications": null},
                {"name": "B", "description": "d", "image": null, "specifications": null}
            ])
        );
    }

    #[test]
    fn reports_skipped_count() {
        let input = json!([{"name": " "}, "string entry", {"title": "Ok"}, {"name": 5}]);
        let report = normalize_list_report(&input);
        assert_eq!(report.items.len(), 1);
        assert_eq!(report.skipped, 3);
    }

    #[test]
    fn non_array_input_is_empty() {
        assert!(normalize_list_items(&json!({"name": "x"})).is_empty());
        assert!(normalize_list_items(&Value::Null).is_empty());
        assert!(normalize_list_items(&json!("[{\"name\":\"x\"}]")).is_empty());
    }

    #[test]
    fn prefers_name_over_title_and_details_over_description() {
        let input = json!([{
            "name": "Microscope",
            "title": "ignored",
            "details": "primary",
            "description": "secondary",
            "image": "scope.png"
        }]);
        let items = normalize_list_items(&input);
        assert_eq!(items[0].name, "Microscope");
        assert_eq!(items[0].description.as_deref(), Some("primary"));
        assert_eq!(items[0].image.as_deref(), Some("scope.png"));
    }

    #[test]
    fn decodes_string_specifications() {
        let input = json!([
            {"name": "Centrifuge", "specifications": "{\"rpm\": 15000}"},
            {"name": "Scale", "specifications": "not json"},
            {"name": "Oven", "specifications": {"max": "300C"}}
        ]);
        let items = normalize_list_items(&input);
        assert_eq!(items[0].specifications, Some(json!({"rpm": 15000})));
        assert_eq!(items[1].specifications, None);
        assert_eq!(items[2].specifications, Some(json!({"max": "300C"})));
    }

    #[test]
    fn canonical_input_is_unchanged() {
        let input = json!([{"title": "A", "details": "x", "image": "a.png", "specifications": "{\"k\":1}"}]);
        let once = normalize_list_items(&input);
        let twice = normalize_list_items(&serde_json::to_value(&once).unwrap());
        assert_eq!(once, twice);
    }
}
