//! Configuration for SQLite database connection pools

use std::time::Duration;

/// Configuration for SqliteDatabase connection pools
///
/// Timeouts configured here are the only timeouts in the stack: queries are
/// never cancelled or retried above this layer.
///
/// # Examples
///
/// ```
/// use table_manager_conn::SqliteDatabaseConfig;
/// use std::time::Duration;
///
/// // Use defaults
/// let config = SqliteDatabaseConfig::default();
///
/// // Override just one field
/// let config = SqliteDatabaseConfig {
///     max_read_connections: 3,
///     ..Default::default()
/// };
/// assert_eq!(config.idle_timeout, Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteDatabaseConfig {
   /// Maximum number of concurrent read connections
   ///
   /// Default: 6
   pub max_read_connections: u32,

   /// Idle timeout for both read and write connections
   ///
   /// Default: 30 seconds
   pub idle_timeout: Duration,

   /// How long to wait for a free pooled connection before failing
   ///
   /// Default: 30 seconds
   pub acquire_timeout: Duration,

   /// How long SQLite waits on a locked database before returning `SQLITE_BUSY`
   ///
   /// Default: 5 seconds
   pub busy_timeout: Duration,
}

impl Default for SqliteDatabaseConfig {
   fn default() -> Self {
      Self {
         max_read_connections: 6,
         idle_timeout: Duration::from_secs(30),
         acquire_timeout: Duration::from_secs(30),
         busy_timeout: Duration::from_secs(5),
      }
   }
}
