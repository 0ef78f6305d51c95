//! Startup configuration for [`TableManager`](crate::TableManager).

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use table_manager_conn::SqliteDatabaseConfig;

use crate::{Error, Result};

/// Where the database lives and how its pools are sized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
   /// Path of the SQLite database file (created if missing)
   pub database_path: PathBuf,

   /// Pool sizes and timeouts
   pub pool: SqliteDatabaseConfig,
}

impl ManagerConfig {
   pub fn new(database_path: impl Into<PathBuf>) -> Self {
      Self {
         database_path: database_path.into(),
         pool: SqliteDatabaseConfig::default(),
      }
   }

   /// Load configuration from process environment variables.
   ///
   /// - `DB_PATH` (required)
   /// - `DB_MAX_READ_CONNECTIONS`
   /// - `DB_IDLE_TIMEOUT_SECS`
   /// - `DB_ACQUIRE_TIMEOUT_SECS`
   /// - `DB_BUSY_TIMEOUT_MS`
   ///
   /// Unset optional variables keep their defaults.
   pub fn from_env() -> Result<Self> {
      Self::from_lookup(|key| std::env::var(key).ok())
   }

   /// Same as [`from_env`](Self::from_env) with a custom variable lookup.
   pub fn from_lookup<F>(lookup: F) -> Result<Self>
   where
      F: Fn(&str) -> Option<String>,
   {
      let database_path = lookup("DB_PATH")
         .filter(|v| !v.trim().is_empty())
         .ok_or_else(|| Error::InvalidConfig {
            key: "DB_PATH".into(),
            value: String::new(),
         })?;

      let defaults = SqliteDatabaseConfig::default();
      let pool = SqliteDatabaseConfig {
         max_read_connections: parse_var(&lookup, "DB_MAX_READ_CONNECTIONS")?
            .unwrap_or(defaults.max_read_connections),
         idle_timeout: parse_var(&lookup, "DB_IDLE_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.idle_timeout),
         acquire_timeout: parse_var(&lookup, "DB_ACQUIRE_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.acquire_timeout),
         busy_timeout: parse_var(&lookup, "DB_BUSY_TIMEOUT_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.busy_timeout),
      };

      Ok(Self {
         database_path: PathBuf::from(database_path),
         pool,
      })
   }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
   T: FromStr,
   F: Fn(&str) -> Option<String>,
{
   match lookup(key) {
      None => Ok(None),
      Some(raw) => raw
         .trim()
         .parse()
         .map(Some)
         .map_err(|_| Error::InvalidConfig {
            key: key.to_string(),
            value: raw,
         }),
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use std::collections::HashMap;

   fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
      let vars: HashMap<String, String> = vars
         .iter()
         .map(|(k, v)| (k.to_string(), v.to_string()))
         .collect();
      move |key| vars.get(key).cloned()
   }

   #[test]
   fn path_only_uses_pool_defaults() {
      let config = ManagerConfig::from_lookup(lookup(&[("DB_PATH", "data/app.db")])).unwrap();

      assert_eq!(config, ManagerConfig::new("data/app.db"));
   }

   #[test]
   fn reads_pool_overrides() {
      let config = ManagerConfig::from_lookup(lookup(&[
         ("DB_PATH", "app.db"),
         ("DB_MAX_READ_CONNECTIONS", "2"),
         ("DB_IDLE_TIMEOUT_SECS", "90"),
         ("DB_ACQUIRE_TIMEOUT_SECS", " 3 "),
         ("DB_BUSY_TIMEOUT_MS", "250"),
      ]))
      .unwrap();

      assert_eq!(config.pool.max_read_connections, 2);
      assert_eq!(config.pool.idle_timeout, Duration::from_secs(90));
      assert_eq!(config.pool.acquire_timeout, Duration::from_secs(3));
      assert_eq!(config.pool.busy_timeout, Duration::from_millis(250));
   }

   #[test]
   fn missing_path_is_an_error() {
      let err = ManagerConfig::from_lookup(lookup(&[])).unwrap_err();
      assert!(matches!(err, Error::InvalidConfig { key, .. } if key == "DB_PATH"));

      let err = ManagerConfig::from_lookup(lookup(&[("DB_PATH", "  ")])).unwrap_err();
      assert!(matches!(err, Error::InvalidConfig { key, .. } if key == "DB_PATH"));
   }

   #[test]
   fn unparseable_number_is_an_error() {
      let err = ManagerConfig::from_lookup(lookup(&[
         ("DB_PATH", "app.db"),
         ("DB_MAX_READ_CONNECTIONS", "many"),
      ]))
      .unwrap_err();

      match err {
         Error::InvalidConfig { key, value } => {
            assert_eq!(key, "DB_MAX_READ_CONNECTIONS");
            assert_eq!(value, "many");
         }
         other => panic!("unexpected error: {other:?}"),
      }
   }
}
