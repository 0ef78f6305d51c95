//! # table-manager
//!
//! Generic CRUD, offset pagination and simple search over SQLite tables.
//!
//! Table and column names are supplied at call time, so every name is checked
//! against `[A-Za-z_][A-Za-z0-9_]*` before it is written into SQL; values are
//! always bound as parameters.
//!
//! ## Core Types
//!
//! - **[`TableManager`]**: Runs the operations against a [`SqliteDatabase`]
//! - **[`Record`]** / **[`Value`]**: One row as an ordered column → value map
//! - **[`PaginationResult`]**: One page of rows plus navigation metadata
//! - **[`Paginator`]**: Pages through a single table with a fixed page size
//! - **[`ManagerConfig`]**: Database path and pool settings
//! - **[`Error`]**: Caller errors and pass-through storage errors
//!
//! # Example
//!
//! ```no_run
//! use table_manager::{ManagerConfig, Record, TableManager};
//!
//! # async fn demo() -> table_manager::Result<()> {
//! let manager = TableManager::connect(&ManagerConfig::from_env()?).await?;
//!
//! let fields = Record::from([
//!    ("name".to_string(), "Ana".into()),
//!    ("email".to_string(), "ana@example.com".into()),
//! ]);
//! let id = manager.insert("users", &fields).await?;
//!
//! let user = manager.get_single("users", id).await?;
//! let page = manager.paginate("users", 1, 10).await?;
//! let matches = manager.search("users", &["name", "email"], "ana").await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod decode;
mod error;
pub mod identifier;
mod manager;
pub mod pagination;
mod query;
mod value;

pub use config::ManagerConfig;
pub use error::{Error, Result};
pub use manager::TableManager;
pub use pagination::{
   DEFAULT_PAGE_SIZE, LinkStrategy, MAX_PAGE_SIZE, PaginationResult, Paginator,
};
pub use query::ID_COLUMN;
pub use value::{Record, Value, record_from_json};

pub use table_manager_conn::{SqliteDatabase, SqliteDatabaseConfig};
