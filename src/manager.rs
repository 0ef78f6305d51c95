//! CRUD, count, page and search operations against one database.

use std::sync::Arc;

use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteQueryResult};
use sqlx::{Row, Sqlite};
use table_manager_conn::SqliteDatabase;
use tracing::{debug, trace};

use crate::config::ManagerConfig;
use crate::decode::{decode_row, decode_rows};
use crate::pagination::{Paginator, PaginationResult, clamp_limit, clamp_page, page_offset};
use crate::query::{self, Statement};
use crate::value::{Record, Value, bind_value};
use crate::Result;

/// Data-access handle over a [`SqliteDatabase`].
///
/// Every operation validates the table and column names it is given, then
/// runs exactly one statement with all values bound as parameters. Reads use
/// the read pool; writes take the single writer. Storage errors are returned
/// as-is and nothing is retried.
///
/// Cloning is cheap and clones share the same pools.
#[derive(Debug, Clone)]
pub struct TableManager {
   db: Arc<SqliteDatabase>,
}

impl TableManager {
   /// Wrap an already opened database.
   pub fn new(db: Arc<SqliteDatabase>) -> Self {
      Self { db }
   }

   /// Open the configured database and wrap it.
   pub async fn connect(config: &ManagerConfig) -> Result<Self> {
      let db = SqliteDatabase::connect(&config.database_path, Some(config.pool.clone())).await?;
      Ok(Self::new(db))
   }

   /// The underlying database, e.g. for schema setup.
   pub fn database(&self) -> &Arc<SqliteDatabase> {
      &self.db
   }

   /// Insert one row and return its rowid.
   ///
   /// Fails with `InvalidIdentifier` for a bad table or field name and with
   /// `EmptyPayload` when `fields` is empty.
   pub async fn insert(&self, table: &str, fields: &Record) -> Result<i64> {
      let statement = query::build_insert(table, fields)?;
      let result = self.execute_write(table, statement).await?;
      Ok(result.last_insert_rowid())
   }

   /// Update the row with the given id.
   ///
   /// Returns `true` when a row was changed and `false` when no row has
   /// that id.
   pub async fn update(&self, table: &str, fields: &Record, id: i64) -> Result<bool> {
      let statement = query::build_update(table, fields, id)?;
      let result = self.execute_write(table, statement).await?;
      Ok(result.rows_affected() > 0)
   }

   /// Delete the row with the given id.
   ///
   /// Returns `true` when a row was removed and `false` when no row has
   /// that id, so deleting twice reports `false` the second time.
   pub async fn delete(&self, table: &str, id: i64) -> Result<bool> {
      let statement = query::build_delete(table, id)?;
      let result = self.execute_write(table, statement).await?;
      Ok(result.rows_affected() > 0)
   }

   /// Fetch the row with the given id, or `None` when there is none.
   pub async fn get_single(&self, table: &str, id: i64) -> Result<Option<Record>> {
      let (sql, values) = query::build_select_by_id(table, id)?;
      debug!(table, sql = %sql, "Fetching single row");

      let row = prepare(&sql, values)
         .fetch_optional(self.db.read_pool()?)
         .await?;
      row.as_ref().map(decode_row).transpose()
   }

   /// Fetch every row, in whatever order the database returns them.
   pub async fn get_all(&self, table: &str) -> Result<Vec<Record>> {
      let statement = query::build_select_all(table)?;
      self.fetch_rows(table, statement).await
   }

   /// Number of rows in the table.
   pub async fn count(&self, table: &str) -> Result<u64> {
      let (sql, values) = query::build_count(table)?;
      debug!(table, sql = %sql, "Counting rows");

      let row = prepare(&sql, values)
         .fetch_one(self.db.read_pool()?)
         .await?;
      let count: i64 = row.try_get(0)?;
      Ok(count.max(0).unsigned_abs())
   }

   /// Fetch one page of rows.
   ///
   /// `page` is raised to at least 1 and an out-of-range `limit` becomes
   /// [`DEFAULT_PAGE_SIZE`](crate::DEFAULT_PAGE_SIZE). Pages past the end are
   /// empty.
   pub async fn fetch_page(&self, table: &str, page: i64, limit: i64) -> Result<Vec<Record>> {
      let page = clamp_page(page);
      let limit = clamp_limit(limit);
      let statement = query::build_select_page(table, limit, page_offset(page, limit))?;
      self.fetch_rows(table, statement).await
   }

   /// Fetch a page together with counts and navigation links for every page.
   pub async fn paginate(&self, table: &str, page: i64, limit: i64) -> Result<PaginationResult> {
      self.paginator(table, limit).fetch(page).await
   }

   /// A reusable [`Paginator`] for `table`.
   pub fn paginator(&self, table: &str, limit: i64) -> Paginator {
      Paginator::new(self.clone(), table, limit)
   }

   /// Rows where any of `columns` contains `term`, ignoring ASCII case.
   ///
   /// A blank term returns every row.
   pub async fn search(&self, table: &str, columns: &[&str], term: &str) -> Result<Vec<Record>> {
      let statement = query::build_search(table, columns, term)?;
      self.fetch_rows(table, statement).await
   }

   /// Rows whose columns equal every value in `filters`.
   ///
   /// [`Value::Null`] matches SQL `NULL`. No filters returns every row.
   pub async fn find_by(&self, table: &str, filters: &Record) -> Result<Vec<Record>> {
      let statement = query::build_find_by(table, filters)?;
      self.fetch_rows(table, statement).await
   }

   /// Close the database pools.
   pub async fn close(&self) -> Result<()> {
      self.db.close().await?;
      Ok(())
   }

   /// Close the database and delete its files.
   pub async fn remove(&self) -> Result<()> {
      self.db.remove().await?;
      Ok(())
   }

   async fn execute_write(&self, table: &str, (sql, values): Statement) -> Result<SqliteQueryResult> {
      debug!(table, sql = %sql, "Executing write");
      trace!(bind_count = values.len(), "Binding write parameters");

      let mut writer = self.db.acquire_writer().await?;
      let result = prepare(&sql, values).execute(&mut *writer).await?;
      Ok(result)
   }

   async fn fetch_rows(&self, table: &str, (sql, values): Statement) -> Result<Vec<Record>> {
      debug!(table, sql = %sql, "Fetching rows");
      trace!(bind_count = values.len(), "Binding read parameters");

      let rows = prepare(&sql, values)
         .fetch_all(self.db.read_pool()?)
         .await?;
      decode_rows(rows)
   }
}

/// Build a SQLx query with every value bound in order.
fn prepare(sql: &str, values: Vec<Value>) -> Query<'_, Sqlite, SqliteArguments<'_>> {
   values
      .into_iter()
      .fold(sqlx::query(sql), |q, value| bind_value(q, value))
}
