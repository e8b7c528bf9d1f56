use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Locale used when the requested one is missing from a mapping.
pub const DEFAULT_LOCALE: &str = "en";

/// A validated locale tag such as `en`, `ar` or `pt-BR`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(String);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid locale tag: {0}")]
pub struct InvalidLocale(pub String);

impl Locale {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn default_locale() -> Self {
        Locale(DEFAULT_LOCALE.to_string())
    }

    /// Parse the first usable tag of an `Accept-Language` header,
    /// ignoring quality weights and wildcards.
    pub fn from_accept_language(header: &str) -> Option<Self> {
        header
            .split(',')
            .filter_map(|part| part.split(';').next())
            .map(str::trim)
            .filter(|tag| !tag.is_empty() && *tag != "*")
            .find_map(|tag| tag.parse().ok())
    }
}

impl FromStr for Locale {
    type Err = InvalidLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().replace('_', "-");
        let mut parts = tag.split('-');

        let primary = parts.next().unwrap_or_default();
        if !(2..=3).contains(&primary.len()) || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(InvalidLocale(s.to_string()));
        }

        let mut normalized = primary.to_ascii_lowercase();
        for sub in parts {
            if !(2..=8).contains(&sub.len()) || !sub.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(InvalidLocale(s.to_string()));
            }
            normalized.push('-');
            normalized.push_str(sub);
        }

        Ok(Locale(normalized))
    }
}

impl TryFrom<String> for Locale {
    type Error = InvalidLocale;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pick one string out of a localized value.
///
/// Plain strings are returned unchanged. Mappings are searched for
/// `locale`, then its language subtag (`ar` for `ar-EG`), then
/// [`DEFAULT_LOCALE`], then the first string entry.
pub fn extract_localized_value(value: Option<&Value>, locale: &str) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map
            .get(locale)
            .and_then(Value::as_str)
            .or_else(|| map.get(primary_subtag(locale)).and_then(Value::as_str))
            .or_else(|| map.get(DEFAULT_LOCALE).and_then(Value::as_str))
            .or_else(|| map.values().find_map(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}

/// Language part of a tag: `ar` for `ar-EG`.
fn primary_subtag(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or(locale)
}

/// Read a localized text column.
///
/// Columns hold either a serialized locale mapping or plain text, so only
/// values that look like an object are decoded.
pub fn localized_from_text(text: Option<&str>) -> Value {
    let Some(raw) = text else { return Value::Null };
    if raw.trim_start().starts_with('{') {
        match serde_json::from_str::<Value>(raw) {
            Ok(decoded @ Value::Object(_)) => return decoded,
            Ok(_) | Err(_) => {
                tracing::warn!(input = %raw, "localized column is not a valid locale mapping, treating as plain text");
            }
        }
    }
    Value::String(raw.to_string())
}

/// Resolve a localized column for output: extracted when a locale is
/// requested, the raw decoded value otherwise.
pub fn localize(value: Value, locale: Option<&Locale>) -> Value {
    match locale {
        Some(locale) => extract_localized_value(Some(&value), locale.as_str())
            .map(Value::String)
            .unwrap_or(Value::Null),
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falls_back_to_default_locale() {
        let v = json!({"en": "Hello", "ar": "مرحبا"});
        assert_eq!(extract_localized_value(Some(&v), "fr"), Some("Hello".to_string()));
        assert_eq!(extract_localized_value(Some(&v), "ar"), Some("مرحبا".to_string()));
    }

    #[test]
    fn region_tags_fall_back_to_their_language() {
        let v = json!({"en": "Kit", "ar": "عدة"});
        assert_eq!(extract_localized_value(Some(&v), "ar-EG"), Some("عدة".to_string()));
        assert_eq!(extract_localized_value(Some(&v), "fr-CA"), Some("Kit".to_string()));

        let regional = json!({"en": "Color", "en-GB": "Colour"});
        assert_eq!(extract_localized_value(Some(&regional), "en-GB"), Some("Colour".to_string()));
        assert_eq!(extract_localized_value(Some(&regional), "en-US"), Some("Color".to_string()));
    }

    #[test]
    fn falls_back_to_first_available() {
        let v = json!({"ar": "مرحبا"});
        assert_eq!(extract_localized_value(Some(&v), "fr"), Some("مرحبا".to_string()));

        let ordered = json!({"fr": null, "de": "Hallo", "ar": "مرحبا"});
        assert_eq!(extract_localized_value(Some(&ordered), "es"), Some("Hallo".to_string()));
    }

    #[test]
    fn handles_plain_missing_and_malformed() {
        assert_eq!(extract_localized_value(Some(&json!("Plain")), "ar"), Some("Plain".to_string()));
        assert_eq!(extract_localized_value(None, "en"), None);
        assert_eq!(extract_localized_value(Some(&Value::Null), "en"), None);
        assert_eq!(extract_localized_value(Some(&json!({})), "en"), None);
        assert_eq!(extract_localized_value(Some(&json!(12)), "en"), None);
        assert_eq!(extract_localized_value(Some(&json!(["en"])), "en"), None);
    }

    #[test]
    fn parses_locale_tags() {
        assert_eq!("en".parse::<Locale>().unwrap().as_str(), "en");
        assert_eq!("AR".parse::<Locale>().unwrap().as_str(), "ar");
        assert_eq!("pt_BR".parse::<Locale>().unwrap().as_str(), "pt-BR");
        assert!("e".parse::<Locale>().is_err());
        assert!("english".parse::<Locale>().is_err());
        assert!("en-".parse::<Locale>().is_err());
        assert!("12".parse::<Locale>().is_err());
    }

    #[test]
    fn reads_accept_language() {
        let locale = Locale::from_accept_language("ar-EG,ar;q=0.9,en;q=0.8").unwrap();
        assert_eq!(locale.as_str(), "ar-EG");
        assert_eq!(Locale::from_accept_language("*, fr;q=0.5").unwrap().as_str(), "fr");
        assert!(Locale::from_accept_language("*").is_none());
        assert!(Locale::from_accept_language("").is_none());
    }

    #[test]
    fn decodes_localized_text_columns() {
        assert_eq!(localized_from_text(Some(r#"{"en":"Lab","ar":"مختبر"}"#)), json!({"en": "Lab", "ar": "مختبر"}));
        assert_eq!(localized_from_text(Some("Just text")), json!("Just text"));
        assert_eq!(localized_from_text(Some("{broken")), json!("{broken"));
        assert_eq!(localized_from_text(None), Value::Null);
    }

    #[test]
    fn localize_keeps_raw_without_locale() {
        let raw = json!({"en": "Lab", "ar": "مختبر"});
        assert_eq!(localize(raw.clone(), None), raw);
        let ar: Locale = "ar".parse().unwrap();
        assert_eq!(localize(raw, Some(&ar)), json!("مختبر"));
        assert_eq!(localize(Value::Null, Some(&ar)), Value::Null);
    }
}
