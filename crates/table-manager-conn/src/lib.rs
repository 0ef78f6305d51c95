//! # table-manager-conn
//!
//! Connection handling for `table-manager`: a thin wrapper around SQLx that
//! opens one SQLite database with separate read and write pools.
//!
//! ## Core Types
//!
//! - **[`SqliteDatabase`]**: Database handle with a read pool and a single writer
//! - **[`SqliteDatabaseConfig`]**: Pool sizes and timeouts
//! - **[`WriteGuard`]**: RAII guard ensuring exclusive write access
//! - **[`Error`]**: Error type for connection operations
//!
//! ## Architecture
//!
//! - **Dual pools**: Read-only pool (default 6 connections) and write pool (max 1 connection)
//! - **Lazy WAL mode**: Write-Ahead Logging enabled on the first writer acquisition
//! - **Exclusive writes**: The single-connection write pool serializes writers
//! - **Concurrent reads**: Readers query simultaneously through the read pool

mod config;
mod database;
mod error;
mod write_guard;

pub use config::SqliteDatabaseConfig;
pub use database::SqliteDatabase;
pub use error::{Error, Result};
pub use write_guard::WriteGuard;
