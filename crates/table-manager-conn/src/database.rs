//! SQLite database with connection pooling and serialized write access

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::debug;

use crate::config::SqliteDatabaseConfig;
use crate::error::{Error, Result};
use crate::write_guard::WriteGuard;

/// SQLite database with connection pooling for concurrent reads and exclusive writes.
///
/// ## Architecture
///
/// The database maintains two connection pools:
/// - **`read_pool`**: Pool of read-only connections for concurrent reads
/// - **`write_conn`**: Single-connection pool for exclusive write access (enforced by max_connections=1)
///
/// ## State Management
///
/// - **`wal_initialized`**: Tracks whether WAL journal mode has been enabled (lazy initialization)
/// - **`closed`**: Prevents use after the database has been closed
/// - **`path`**: Database file path for cleanup operations
///
/// ## Usage Pattern
///
/// ```text
/// 1. Connect to database (creates the file if missing)
/// 2. Read operations: Access read_pool for concurrent reads
/// 3. Write operations: Acquire writer (lazily enables WAL on first call)
/// 4. Close database when done
/// ```
#[derive(Debug)]
pub struct SqliteDatabase {
   /// Pool of read-only connections for concurrent reads
   read_pool: Pool<Sqlite>,

   /// Single read-write connection pool (max_connections=1) for serialized writes
   write_conn: Pool<Sqlite>,

   /// Tracks if WAL mode has been initialized (set on first write)
   wal_initialized: AtomicBool,

   /// Marks database as closed to prevent further operations
   closed: AtomicBool,

   /// Path to database file (used for cleanup)
   path: PathBuf,
}

impl SqliteDatabase {
   /// Open (or create) the database at `path`.
   ///
   /// The write pool is opened first so the file exists before the read-only
   /// pool connects to it. Missing parent directories are created.
   pub async fn connect(
      path: impl AsRef<Path>,
      custom_config: Option<SqliteDatabaseConfig>,
   ) -> Result<Arc<Self>> {
      let config = custom_config.unwrap_or_default();
      let path = path.as_ref().to_path_buf();

      if let Some(parent) = path.parent()
         && !parent.as_os_str().is_empty()
      {
         std::fs::create_dir_all(parent)?;
      }

      let base_options = SqliteConnectOptions::new()
         .filename(&path)
         .busy_timeout(config.busy_timeout);

      let write_conn = SqlitePoolOptions::new()
         .max_connections(1)
         .idle_timeout(config.idle_timeout)
         .acquire_timeout(config.acquire_timeout)
         .connect_with(base_options.clone().create_if_missing(true))
         .await?;

      let read_pool = SqlitePoolOptions::new()
         .max_connections(config.max_read_connections.max(1))
         .idle_timeout(config.idle_timeout)
         .acquire_timeout(config.acquire_timeout)
         .connect_with(base_options.read_only(true))
         .await?;

      debug!(
         path = %path.display(),
         max_read_connections = config.max_read_connections,
         "Opened SQLite database"
      );

      Ok(Arc::new(Self {
         read_pool,
         write_conn,
         wal_initialized: AtomicBool::new(false),
         closed: AtomicBool::new(false),
         path,
      }))
   }

   /// Get the read-only connection pool.
   pub fn read_pool(&self) -> Result<&Pool<Sqlite>> {
      self.ensure_open()?;
      Ok(&self.read_pool)
   }

   /// Acquire the single writer, waiting while another task holds it.
   ///
   /// The first acquisition switches the database to WAL journal mode so
   /// readers are not blocked by the writer.
   pub async fn acquire_writer(&self) -> Result<WriteGuard> {
      self.ensure_open()?;

      let mut conn = self.write_conn.acquire().await?;

      if !self.wal_initialized.load(Ordering::Acquire) {
         sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&mut *conn)
            .await?;
         self.wal_initialized.store(true, Ordering::Release);
         debug!(path = %self.path.display(), "Enabled WAL journal mode");
      }

      Ok(WriteGuard::new(conn))
   }

   /// Path of the database file.
   pub fn path(&self) -> &Path {
      &self.path
   }

   /// Whether [`close`](Self::close) has been called.
   pub fn is_closed(&self) -> bool {
      self.closed.load(Ordering::Acquire)
   }

   /// Close both pools. Closing twice is a no-op.
   pub async fn close(&self) -> Result<()> {
      if self.closed.swap(true, Ordering::AcqRel) {
         return Ok(());
      }

      self.read_pool.close().await;
      self.write_conn.close().await;
      debug!(path = %self.path.display(), "Closed SQLite database");
      Ok(())
   }

   /// Close the database and delete its file along with the WAL side files.
   pub async fn remove(&self) -> Result<()> {
      self.close().await?;

      for file in [
         self.path.clone(),
         sidecar_path(&self.path, "-wal"),
         sidecar_path(&self.path, "-shm"),
      ] {
         match tokio::fs::remove_file(&file).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::Io(e)),
         }
      }

      debug!(path = %self.path.display(), "Removed SQLite database files");
      Ok(())
   }

   fn ensure_open(&self) -> Result<()> {
      if self.is_closed() {
         return Err(Error::DatabaseClosed);
      }
      Ok(())
   }
}

/// Build `<db path><suffix>`, e.g. `app.db-wal`.
fn sidecar_path(path: &Path, suffix: &str) -> PathBuf {
   let mut name = OsString::from(path.as_os_str());
   name.push(suffix);
   PathBuf::from(name)
}
