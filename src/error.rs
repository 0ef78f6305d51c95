/// Result type alias for table-manager operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for table-manager operations.
///
/// Caller mistakes (`InvalidIdentifier`, `EmptyPayload`, `EmptySearchColumns`)
/// are raised before any SQL runs. Storage failures (`Sqlx`,
/// `ConnectionManager`) are passed through untouched.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// Error from SQLx operations.
   #[error(transparent)]
   Sqlx(#[from] sqlx::Error),

   /// Error from the connection manager.
   #[error(transparent)]
   ConnectionManager(#[from] table_manager_conn::Error),

   /// Table or column name contains characters that are not allowed.
   ///
   /// Names must match `[A-Za-z_][A-Za-z0-9_]*`.
   #[error("invalid table or column name '{name}': must match [A-Za-z_][A-Za-z0-9_]*")]
   InvalidIdentifier { name: String },

   /// Insert or update called without any fields.
   #[error("no fields to write for table '{table}'")]
   EmptyPayload { table: String },

   /// Search called without any columns to match against.
   #[error("search requires at least one column")]
   EmptySearchColumns,

   /// Column value that could not be decoded as its storage class.
   #[error("failed to decode column value: {0}")]
   Decode(#[from] sqlx::error::BoxDynError),

   /// SQLite type that cannot be mapped to a [`Value`](crate::Value).
   #[error("unsupported datatype: {0}")]
   UnsupportedDatatype(String),

   /// JSON value with no scalar counterpart (arrays and objects).
   #[error("unsupported value: {0}")]
   UnsupportedValue(String),

   /// Configuration value could not be parsed.
   #[error("invalid configuration value for {key}: '{value}'")]
   InvalidConfig { key: String, value: String },
}

impl Error {
   /// Extract a structured error code from the error type.
   pub fn error_code(&self) -> String {
      match self {
         Error::Sqlx(e) => {
            if let Some(code) = e.as_database_error().and_then(|db_err| db_err.code()) {
               return format!("SQLITE_{}", code);
            }
            "SQLX_ERROR".to_string()
         }
         Error::ConnectionManager(_) => "CONNECTION_ERROR".to_string(),
         Error::InvalidIdentifier { .. } => "INVALID_IDENTIFIER".to_string(),
         Error::EmptyPayload { .. } => "EMPTY_PAYLOAD".to_string(),
         Error::EmptySearchColumns => "EMPTY_SEARCH_COLUMNS".to_string(),
         Error::Decode(_) => "DECODE_ERROR".to_string(),
         Error::UnsupportedDatatype(_) => "UNSUPPORTED_DATATYPE".to_string(),
         Error::UnsupportedValue(_) => "UNSUPPORTED_VALUE".to_string(),
         Error::InvalidConfig { .. } => "INVALID_CONFIG".to_string(),
      }
   }

   /// Whether the failure came from below the access layer (connection,
   /// constraint, syntax, timeout) rather than from the caller's input.
   pub fn is_storage_error(&self) -> bool {
      matches!(self, Error::Sqlx(_) | Error::ConnectionManager(_))
   }
}
