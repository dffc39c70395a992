//! Error types for the permissions reconciler
//!
//! Every variant is fatal. Nothing in this tool retries or recovers.

use thiserror::Error;

/// Errors that can occur while reconciling permissions
#[derive(Error, Debug)]
pub enum Error {
    /// The input document is not valid JSON
    #[error("invalid input document: {0}")]
    InvalidInput(#[from] serde_json::Error),

    /// The input document is JSON but not shaped like a permissions document
    #[error("malformed specification: {0}")]
    MalformedSpecification(String),

    /// Cannot reach the MySQL server
    #[error("cannot connect to MySQL at {target}: {source}")]
    Connection {
        target: String,
        #[source]
        source: mysql::Error,
    },

    /// Cannot add the fingerprint column
    #[error("failed to migrate table '{table}': {source}")]
    SchemaMigration {
        table: &'static str,
        #[source]
        source: mysql::Error,
    },

    /// A statement failed while reading or applying grants
    #[error("store error: {0}")]
    Store(#[from] mysql::Error),

    /// A stored row holds a value this tool cannot interpret
    #[error("unexpected value {value:?} in column {column}")]
    UnexpectedValue { column: &'static str, value: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for reconciler operations
pub type Result<T> = std::result::Result<T, Error>;
