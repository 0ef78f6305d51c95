//! Error types for table-manager-conn

use thiserror::Error;

/// Errors that may occur while opening or using a [`SqliteDatabase`](crate::SqliteDatabase)
#[derive(Error, Debug)]
pub enum Error {
   /// IO error when creating the database directory or removing database files
   #[error("IO error: {0}")]
   Io(#[from] std::io::Error),

   /// Error from the sqlx library while opening pools or acquiring connections
   #[error("Sqlx error: {0}")]
   Sqlx(#[from] sqlx::Error),

   /// Database has been closed and cannot be used
   #[error("Database has been closed")]
   DatabaseClosed,
}

/// A type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
