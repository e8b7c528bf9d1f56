use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueRef},
    Decode, Postgres, Type, ValueRef,
};

/// A column holding structured data, either serialized into `text` or
/// stored natively (`json`/`jsonb`, or a decoded value in a JSON export).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonColumn {
    Text(String),
    Json(Value),
}

impl From<&str> for JsonColumn {
    fn from(text: &str) -> Self {
        JsonColumn::Text(text.to_string())
    }
}

impl From<String> for JsonColumn {
    fn from(text: String) -> Self {
        JsonColumn::Text(text)
    }
}

impl From<Value> for JsonColumn {
    fn from(value: Value) -> Self {
        JsonColumn::Json(value)
    }
}

impl Type<Postgres> for JsonColumn {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<Postgres>>::compatible(ty) || <Value as Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for JsonColumn {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let native = <Value as Type<Postgres>>::compatible(&value.type_info());
        if native {
            Ok(JsonColumn::Json(<Value as Decode<Postgres>>::decode(value)?))
        } else {
            Ok(JsonColumn::Text(<String as Decode<Postgres>>::decode(value)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_text_and_native_values() {
        let text: JsonColumn = serde_json::from_value(json!("[\"a.jpg\"]")).unwrap();
        assert_eq!(text, JsonColumn::Text("[\"a.jpg\"]".into()));

        let native: JsonColumn = serde_json::from_value(json!(["a.jpg"])).unwrap();
        assert_eq!(native, JsonColumn::Json(json!(["a.jpg"])));

        let object: JsonColumn = serde_json::from_value(json!({"weight": "2kg"})).unwrap();
        assert_eq!(object, JsonColumn::Json(json!({"weight": "2kg"})));
    }
}
