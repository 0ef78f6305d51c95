//! SQL construction for table operations.
//!
//! Every builder validates the identifiers it interpolates and returns the
//! statement text together with the values to bind, in placeholder order.
//! Nothing here touches the database.

use crate::identifier::{quote_identifier, validate, validate_all};
use crate::value::{Record, Value};
use crate::{Error, Result};

/// Primary key column used by the id-based operations.
pub const ID_COLUMN: &str = "id";

/// A statement and its bind values.
pub(crate) type Statement = (String, Vec<Value>);

fn placeholder(n: usize) -> String {
   format!("${}", n)
}

fn validate_payload(table: &str, fields: &Record) -> Result<()> {
   validate(table)?;
   if fields.is_empty() {
      return Err(Error::EmptyPayload {
         table: table.to_string(),
      });
   }
   validate_all(fields.keys().map(String::as_str))
}

/// `INSERT INTO "t" ("a", "b") VALUES ($1, $2)`
pub(crate) fn build_insert(table: &str, fields: &Record) -> Result<Statement> {
   validate_payload(table, fields)?;

   let columns: Vec<String> = fields.keys().map(|k| quote_identifier(k)).collect();
   let placeholders: Vec<String> = (1..=fields.len()).map(placeholder).collect();

   let sql = format!(
      "INSERT INTO {} ({}) VALUES ({})",
      quote_identifier(table),
      columns.join(", "),
      placeholders.join(", ")
   );
   Ok((sql, fields.values().cloned().collect()))
}

/// `UPDATE "t" SET "a" = $1, "b" = $2 WHERE "id" = $3`
pub(crate) fn build_update(table: &str, fields: &Record, id: i64) -> Result<Statement> {
   validate_payload(table, fields)?;

   let assignments: Vec<String> = fields
      .keys()
      .enumerate()
      .map(|(i, k)| format!("{} = {}", quote_identifier(k), placeholder(i + 1)))
      .collect();

   let sql = format!(
      "UPDATE {} SET {} WHERE {} = {}",
      quote_identifier(table),
      assignments.join(", "),
      quote_identifier(ID_COLUMN),
      placeholder(fields.len() + 1)
   );

   let mut values: Vec<Value> = fields.values().cloned().collect();
   values.push(Value::Integer(id));
   Ok((sql, values))
}

/// `DELETE FROM "t" WHERE "id" = $1`
pub(crate) fn build_delete(table: &str, id: i64) -> Result<Statement> {
   validate(table)?;
   let sql = format!(
      "DELETE FROM {} WHERE {} = $1",
      quote_identifier(table),
      quote_identifier(ID_COLUMN)
   );
   Ok((sql, vec![Value::Integer(id)]))
}

/// `SELECT * FROM "t" WHERE "id" = $1`
pub(crate) fn build_select_by_id(table: &str, id: i64) -> Result<Statement> {
   validate(table)?;
   let sql = format!(
      "SELECT * FROM {} WHERE {} = $1",
      quote_identifier(table),
      quote_identifier(ID_COLUMN)
   );
   Ok((sql, vec![Value::Integer(id)]))
}

/// `SELECT * FROM "t"`, no ordering.
pub(crate) fn build_select_all(table: &str) -> Result<Statement> {
   validate(table)?;
   Ok((format!("SELECT * FROM {}", quote_identifier(table)), vec![]))
}

/// `SELECT COUNT(*) FROM "t"`
pub(crate) fn build_count(table: &str) -> Result<Statement> {
   validate(table)?;
   Ok((
      format!("SELECT COUNT(*) FROM {}", quote_identifier(table)),
      vec![],
   ))
}

/// `SELECT * FROM "t" LIMIT $1 OFFSET $2`
///
/// `limit` and `offset` are expected to be clamped by the caller already.
pub(crate) fn build_select_page(table: &str, limit: i64, offset: i64) -> Result<Statement> {
   validate(table)?;
   let sql = format!(
      "SELECT * FROM {} LIMIT $1 OFFSET $2",
      quote_identifier(table)
   );
   Ok((sql, vec![Value::Integer(limit), Value::Integer(offset)]))
}

/// Escape `LIKE` wildcards so `term` matches literally (used with `ESCAPE '\'`).
fn escape_like(term: &str) -> String {
   let mut escaped = String::with_capacity(term.len());
   for ch in term.chars() {
      if matches!(ch, '\\' | '%' | '_') {
         escaped.push('\\');
      }
      escaped.push(ch);
   }
   escaped
}

/// `SELECT * FROM "t" WHERE "a" LIKE $1 ESCAPE '\' OR "b" LIKE $2 ESCAPE '\'`
///
/// A blank term selects every row.
pub(crate) fn build_search(table: &str, columns: &[&str], term: &str) -> Result<Statement> {
   validate(table)?;
   if columns.is_empty() {
      return Err(Error::EmptySearchColumns);
   }
   validate_all(columns.iter().copied())?;

   let term = term.trim();
   if term.is_empty() {
      return build_select_all(table);
   }

   let pattern = format!("%{}%", escape_like(term));
   let conditions: Vec<String> = columns
      .iter()
      .enumerate()
      .map(|(i, col)| {
         format!(
            r"{} LIKE {} ESCAPE '\'",
            quote_identifier(col),
            placeholder(i + 1)
         )
      })
      .collect();

   let sql = format!(
      "SELECT * FROM {} WHERE {}",
      quote_identifier(table),
      conditions.join(" OR ")
   );
   let values = columns.iter().map(|_| Value::Text(pattern.clone())).collect();
   Ok((sql, values))
}

/// `SELECT * FROM "t" WHERE "a" = $1 AND "b" IS NULL`
///
/// No filters selects every row.
pub(crate) fn build_find_by(table: &str, filters: &Record) -> Result<Statement> {
   validate(table)?;
   validate_all(filters.keys().map(String::as_str))?;

   if filters.is_empty() {
      return build_select_all(table);
   }

   let mut conditions = Vec::with_capacity(filters.len());
   let mut values = Vec::with_capacity(filters.len());
   for (column, value) in filters {
      if value.is_null() {
         conditions.push(format!("{} IS NULL", quote_identifier(column)));
      } else {
         values.push(value.clone());
         conditions.push(format!(
            "{} = {}",
            quote_identifier(column),
            placeholder(values.len())
         ));
      }
   }

   let sql = format!(
      "SELECT * FROM {} WHERE {}",
      quote_identifier(table),
      conditions.join(" AND ")
   );
   Ok((sql, values))
}
