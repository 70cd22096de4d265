//! Warehouse client error types

use std::fmt;

/// Errors that can occur talking to the warehouse
#[derive(Debug)]
pub enum ClientError {
    /// Transport failure
    Http { source: reqwest::Error },
    /// The warehouse rejected the SQL statement
    Sql { message: String },
    /// The upload endpoint rejected the table write
    Upload { tablename: String, message: String },
    /// DataFrame construction or projection failed
    DataFrame { source: polars::error::PolarsError },
    /// The API answered with a body the client cannot interpret
    Malformed { detail: String },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http { source } => write!(f, "Warehouse request failed: {}", source),
            Self::Sql { message } => write!(f, "Query rejected by the warehouse: {}", message),
            Self::Upload { tablename, message } => {
                write!(f, "Upload of table '{}' failed: {}", tablename, message)
            }
            Self::DataFrame { source } => write!(f, "DataFrame operation failed: {}", source),
            Self::Malformed { detail } => write!(f, "Unexpected warehouse response: {}", detail),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http { source } => Some(source),
            Self::DataFrame { source } => Some(source),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Http { source: err }
    }
}

impl From<polars::error::PolarsError> for ClientError {
    fn from(err: polars::error::PolarsError) -> Self {
        ClientError::DataFrame { source: err }
    }
}
