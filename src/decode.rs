//! Decoding SQLite rows into [`Record`]s.

use sqlx::sqlite::{SqliteRow, SqliteValueRef};
use sqlx::{Column, Row, TypeInfo, Value as _, ValueRef};
use time::PrimitiveDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::Error;
use crate::value::{Record, TIMESTAMP_FORMAT, Value};

/// Text layouts accepted for `DATETIME` columns: SQLite's own, and the
/// fractional/`T`-separated forms written by other clients.
const TIMESTAMP_INPUT_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
   TIMESTAMP_FORMAT,
   format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
   format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
   format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
];

/// Decode every row, keeping result column order.
pub(crate) fn decode_rows(rows: Vec<SqliteRow>) -> Result<Vec<Record>, Error> {
   rows.iter().map(decode_row).collect()
}

pub(crate) fn decode_row(row: &SqliteRow) -> Result<Record, Error> {
   let mut record = Record::with_capacity(row.columns().len());
   for (i, column) in row.columns().iter().enumerate() {
      let raw = row.try_get_raw(i)?;
      let value = to_value(raw, column.type_info().name())?;
      record.insert(column.name().to_string(), value);
   }
   Ok(record)
}

/// Convert one raw value using its runtime storage class.
///
/// `declared` is the column's declared type; text stored in a `DATETIME`
/// column becomes a [`Value::Timestamp`] when it parses.
fn to_value(raw: SqliteValueRef<'_>, declared: &str) -> Result<Value, Error> {
   if raw.is_null() {
      return Ok(Value::Null);
   }

   let storage = raw.type_info().name().to_string();
   let owned = ValueRef::to_owned(&raw);

   let value = match storage.as_str() {
      "INTEGER" | "BOOLEAN" => Value::Integer(owned.try_decode()?),
      "REAL" => Value::Float(owned.try_decode()?),
      "NUMERIC" => match owned.try_decode::<i64>() {
         Ok(v) => Value::Integer(v),
         Err(_) => Value::Float(owned.try_decode()?),
      },
      "TEXT" => {
         let text: String = owned.try_decode()?;
         if declared == "DATETIME" {
            parse_timestamp(&text).map_or(Value::Text(text), Value::Timestamp)
         } else {
            Value::Text(text)
         }
      }
      "BLOB" => Value::Blob(owned.try_decode()?),
      "NULL" => Value::Null,
      _ => return Err(Error::UnsupportedDatatype(storage)),
   };

   Ok(value)
}

fn parse_timestamp(text: &str) -> Option<PrimitiveDateTime> {
   TIMESTAMP_INPUT_FORMATS
      .iter()
      .find_map(|format| PrimitiveDateTime::parse(text, *format).ok())
}
