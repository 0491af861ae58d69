//! Building Polars columns from loosely-typed JSON values.

use polars::prelude::{Column, DataType, NamedFrom, Series};
use serde_json::Value;

/// Column dtype inferred from the non-null JSON values it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    Null,
    Boolean,
    Integer,
    Float,
    Text,
}

impl JsonKind {
    fn of(value: &Value) -> Self {
        match value {
            Value::Null => JsonKind::Null,
            Value::Bool(_) => JsonKind::Boolean,
            Value::Number(n) if n.is_i64() => JsonKind::Integer,
            Value::Number(_) => JsonKind::Float,
            _ => JsonKind::Text,
        }
    }

    /// Widen two kinds to one that can hold both.
    fn merge(self, other: JsonKind) -> JsonKind {
        match (self, other) {
            (a, b) if a == b => a,
            (JsonKind::Null, b) => b,
            (a, JsonKind::Null) => a,
            (JsonKind::Integer, JsonKind::Float) | (JsonKind::Float, JsonKind::Integer) => {
                JsonKind::Float
            }
            _ => JsonKind::Text,
        }
    }

    pub fn dtype(self) -> DataType {
        match self {
            JsonKind::Null | JsonKind::Text => DataType::String,
            JsonKind::Boolean => DataType::Boolean,
            JsonKind::Integer => DataType::Int64,
            JsonKind::Float => DataType::Float64,
        }
    }
}

/// Infer the widest kind across a column's values.
pub fn infer_kind(values: &[Value]) -> JsonKind {
    values
        .iter()
        .map(JsonKind::of)
        .fold(JsonKind::Null, JsonKind::merge)
}

/// Text rendering of a scalar JSON value. Strings are returned unquoted.
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Build a typed column from the JSON values of one field.
pub fn json_column(name: &str, values: &[Value]) -> Column {
    let series = match infer_kind(values) {
        JsonKind::Boolean => {
            let data: Vec<Option<bool>> = values.iter().map(Value::as_bool).collect();
            Series::new(name.into(), data)
        }
        JsonKind::Integer => {
            let data: Vec<Option<i64>> = values.iter().map(Value::as_i64).collect();
            Series::new(name.into(), data)
        }
        JsonKind::Float => {
            let data: Vec<Option<f64>> = values.iter().map(Value::as_f64).collect();
            Series::new(name.into(), data)
        }
        JsonKind::Null | JsonKind::Text => {
            let data: Vec<Option<String>> = values.iter().map(value_to_text).collect();
            Series::new(name.into(), data)
        }
    };
    series.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integers_widen_to_float() {
        let values = vec![json!(1), Value::Null, json!(2.5)];
        assert_eq!(infer_kind(&values), JsonKind::Float);
    }

    #[test]
    fn mixed_scalars_become_text() {
        let values = vec![json!(8471214), json!("8471215")];
        assert_eq!(infer_kind(&values), JsonKind::Text);
        let column = json_column("playerId", &values);
        assert_eq!(column.dtype(), &DataType::String);
    }

    #[test]
    fn all_null_column_is_text() {
        let column = json_column("reason", &[Value::Null, Value::Null]);
        assert_eq!(column.dtype(), &DataType::String);
        assert_eq!(column.null_count(), 2);
    }
}
