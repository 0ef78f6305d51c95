//! Row values and their binding onto SQLx queries.

use base64::Engine;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;
use sqlx::Sqlite;
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use time::PrimitiveDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::Error;

/// One row of a table: column name to value, in result column order.
pub type Record = IndexMap<String, Value>;

/// Format used to serialize timestamps, matching SQLite's `CURRENT_TIMESTAMP`.
pub(crate) const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
   format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// A single scalar stored in a column.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
   Null,
   Integer(i64),
   Float(f64),
   Text(String),
   /// Date and time without offset, as SQLite stores `DATETIME` columns
   Timestamp(PrimitiveDateTime),
   Blob(Vec<u8>),
}

impl Value {
   pub fn is_null(&self) -> bool {
      matches!(self, Value::Null)
   }

   pub fn as_i64(&self) -> Option<i64> {
      match self {
         Value::Integer(v) => Some(*v),
         _ => None,
      }
   }

   /// Numeric value as `f64`; integers are widened.
   pub fn as_f64(&self) -> Option<f64> {
      match self {
         Value::Float(v) => Some(*v),
         Value::Integer(v) => Some(*v as f64),
         _ => None,
      }
   }

   pub fn as_str(&self) -> Option<&str> {
      match self {
         Value::Text(v) => Some(v),
         _ => None,
      }
   }

   pub fn as_timestamp(&self) -> Option<PrimitiveDateTime> {
      match self {
         Value::Timestamp(v) => Some(*v),
         _ => None,
      }
   }

   pub fn as_bytes(&self) -> Option<&[u8]> {
      match self {
         Value::Blob(v) => Some(v),
         _ => None,
      }
   }
}

impl Serialize for Value {
   fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
      match self {
         Value::Null => serializer.serialize_unit(),
         Value::Integer(v) => serializer.serialize_i64(*v),
         Value::Float(v) => serializer.serialize_f64(*v),
         Value::Text(v) => serializer.serialize_str(v),
         Value::Timestamp(v) => {
            let formatted = v
               .format(TIMESTAMP_FORMAT)
               .map_err(serde::ser::Error::custom)?;
            serializer.serialize_str(&formatted)
         }
         Value::Blob(v) => {
            serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(v))
         }
      }
   }
}

impl From<i64> for Value {
   fn from(v: i64) -> Self {
      Value::Integer(v)
   }
}

impl From<i32> for Value {
   fn from(v: i32) -> Self {
      Value::Integer(v.into())
   }
}

impl From<bool> for Value {
   fn from(v: bool) -> Self {
      Value::Integer(v.into())
   }
}

impl From<f64> for Value {
   fn from(v: f64) -> Self {
      Value::Float(v)
   }
}

impl From<&str> for Value {
   fn from(v: &str) -> Self {
      Value::Text(v.to_owned())
   }
}

impl From<String> for Value {
   fn from(v: String) -> Self {
      Value::Text(v)
   }
}

impl From<PrimitiveDateTime> for Value {
   fn from(v: PrimitiveDateTime) -> Self {
      Value::Timestamp(v)
   }
}

impl From<Vec<u8>> for Value {
   fn from(v: Vec<u8>) -> Self {
      Value::Blob(v)
   }
}

impl<T: Into<Value>> From<Option<T>> for Value {
   fn from(v: Option<T>) -> Self {
      v.map_or(Value::Null, Into::into)
   }
}

impl TryFrom<JsonValue> for Value {
   type Error = Error;

   /// Convert a JSON scalar, e.g. a field of a submitted form.
   ///
   /// Booleans become `0`/`1` as SQLite stores them. Integers that do not fit
   /// in `i64` fall back to `f64`.
   fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
      match value {
         JsonValue::Null => Ok(Value::Null),
         JsonValue::Bool(b) => Ok(b.into()),
         JsonValue::String(s) => Ok(Value::Text(s)),
         JsonValue::Number(number) => {
            if let Some(int_val) = number.as_i64() {
               Ok(Value::Integer(int_val))
            } else {
               Ok(Value::Float(number.as_f64().unwrap_or_default()))
            }
         }
         other @ (JsonValue::Array(_) | JsonValue::Object(_)) => {
            Err(Error::UnsupportedValue(other.to_string()))
         }
      }
   }
}

/// Build a [`Record`] from a JSON object, converting each field.
pub fn record_from_json(object: serde_json::Map<String, JsonValue>) -> Result<Record, Error> {
   object
      .into_iter()
      .map(|(key, value)| Ok((key, Value::try_from(value)?)))
      .collect()
}

/// Bind a value to a SQLx query as the next positional parameter.
pub(crate) fn bind_value<'a>(
   query: Query<'a, Sqlite, SqliteArguments<'a>>,
   value: Value,
) -> Query<'a, Sqlite, SqliteArguments<'a>> {
   match value {
      Value::Null => query.bind(None::<i64>),
      Value::Integer(v) => query.bind(v),
      Value::Float(v) => query.bind(v),
      Value::Text(v) => query.bind(v),
      Value::Timestamp(v) => query.bind(v),
      Value::Blob(v) => query.bind(v),
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use serde_json::json;
   use time::macros::datetime;

   #[test]
   fn serializes_to_plain_json_scalars() {
      let record = Record::from([
         ("id".to_string(), Value::Integer(7)),
         ("name".to_string(), Value::from("Ana")),
         ("score".to_string(), Value::Float(1.5)),
         ("deleted_at".to_string(), Value::Null),
         (
            "created_at".to_string(),
            Value::Timestamp(datetime!(2024-03-01 09:30:00)),
         ),
         ("avatar".to_string(), Value::Blob(b"Hello".to_vec())),
      ]);

      assert_eq!(
         serde_json::to_value(&record).unwrap(),
         json!({
            "id": 7,
            "name": "Ana",
            "score": 1.5,
            "deleted_at": null,
            "created_at": "2024-03-01 09:30:00",
            "avatar": "SGVsbG8=",
         })
      );
   }

   #[test]
   fn serialization_keeps_column_order() {
      let record = Record::from([
         ("z".to_string(), Value::Integer(1)),
         ("a".to_string(), Value::Integer(2)),
      ]);
      assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"z":1,"a":2}"#);
   }

   #[test]
   fn converts_json_scalars() {
      assert_eq!(Value::try_from(json!(null)).unwrap(), Value::Null);
      assert_eq!(Value::try_from(json!(true)).unwrap(), Value::Integer(1));
      assert_eq!(Value::try_from(json!(42)).unwrap(), Value::Integer(42));
      assert_eq!(Value::try_from(json!(2.5)).unwrap(), Value::Float(2.5));
      assert_eq!(
         Value::try_from(json!("x")).unwrap(),
         Value::Text("x".into())
      );
      assert_eq!(
         Value::try_from(json!(u64::MAX)).unwrap(),
         Value::Float(u64::MAX as f64)
      );
   }

   #[test]
   fn rejects_json_containers() {
      assert!(matches!(
         Value::try_from(json!([1, 2])),
         Err(Error::UnsupportedValue(_))
      ));
      assert!(matches!(
         Value::try_from(json!({"a": 1})),
         Err(Error::UnsupportedValue(_))
      ));
   }

   #[test]
   fn record_from_json_object() {
      let JsonValue::Object(object) = json!({"name": "Ana", "age": 30}) else {
         unreachable!()
      };
      let record = record_from_json(object).unwrap();
      assert_eq!(record["name"], Value::from("Ana"));
      assert_eq!(record["age"], Value::Integer(30));
   }

   #[test]
   fn option_maps_none_to_null() {
      assert_eq!(Value::from(None::<i64>), Value::Null);
      assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
   }

   #[test]
   fn accessors_match_variant() {
      assert_eq!(Value::Integer(3).as_i64(), Some(3));
      assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
      assert_eq!(Value::Text("a".into()).as_i64(), None);
      assert_eq!(Value::Text("a".into()).as_str(), Some("a"));
      assert_eq!(Value::Blob(vec![1]).as_bytes(), Some(&[1u8][..]));
      assert!(Value::Null.is_null());
      assert_eq!(
         Value::Timestamp(datetime!(2024-01-01 0:00)).as_timestamp(),
         Some(datetime!(2024-01-01 0:00))
      );
   }
}
