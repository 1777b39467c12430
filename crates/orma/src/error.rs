//! Error types for orma

use thiserror::Error;

/// Result type alias for orma operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for statement building and execution
#[derive(Debug, Error)]
pub enum OrmError {
    /// A logical field name has no entry in the resolved model
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A result column has no mapped field in the resolved model
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// An expression node cannot be used in the position it was placed
    #[error("unsupported expression type: {0}")]
    UnsupportedExpression(String),

    /// A table reference cannot be used in the position it was placed
    #[error("unsupported table reference: {0}")]
    UnsupportedTable(String),

    /// Only structs with named fields can be registered as models
    #[error("only structs with named fields can be registered, got {0}")]
    NotAStruct(String),

    /// A field tag segment is not a `key=value` pair
    #[error("invalid tag content: {0}")]
    InvalidTagContent(String),

    /// Two fields of one model map to the same column
    #[error("column '{column}' of field '{field}' is already mapped to field '{existing}'")]
    DuplicateColumn {
        column: String,
        field: String,
        existing: String,
    },

    /// An upsert was requested with no assignments
    #[error("upsert has no assignments")]
    EmptyUpsert,

    /// UPDATE built without any SET assignment
    #[error("no updated columns")]
    NoUpdatedColumns,

    /// INSERT built without any row
    #[error("no inserted rows")]
    NoInsertedRows,

    /// A read matched zero rows
    #[error("no rows in result set")]
    NoRows,

    /// Row decode/mapping error
    #[error("decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Error reported by the driver collaborator
    #[error("driver error: {0}")]
    Driver(String),

    /// Query timeout error
    #[error("query timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// Postgres driver error
    #[cfg(feature = "postgres")]
    #[error("postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create an unknown field error
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField(field.into())
    }

    /// Create a driver error
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver(message.into())
    }

    /// Check if this is an unknown field error
    pub fn is_unknown_field(&self) -> bool {
        matches!(self, Self::UnknownField(_))
    }

    /// Check if this is a no rows error
    pub fn is_no_rows(&self) -> bool {
        matches!(self, Self::NoRows)
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        assert_eq!(
            OrmError::unknown_field("Age").to_string(),
            "unknown field: Age"
        );
        assert_eq!(
            OrmError::InvalidTagContent("column".into()).to_string(),
            "invalid tag content: column"
        );
        assert_eq!(OrmError::NoUpdatedColumns.to_string(), "no updated columns");
    }

    #[test]
    fn test_predicates() {
        assert!(OrmError::NoRows.is_no_rows());
        assert!(OrmError::unknown_field("x").is_unknown_field());
        assert!(!OrmError::NoRows.is_unknown_field());
        assert!(OrmError::Timeout(std::time::Duration::from_secs(1)).is_timeout());
    }
}
