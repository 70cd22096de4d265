//! Catalog error types

use std::fmt;

/// Errors that can occur during catalog lookups
#[derive(Debug)]
pub enum CatalogError {
    /// No entity with the given id exists
    NotFound { kind: &'static str, id: String },
    /// Transport or protocol failure talking to the metadata API
    Http { source: reqwest::Error },
    /// The API answered with a body that does not describe the entity
    Malformed { kind: &'static str, id: String, detail: String },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { kind, id } => {
                write!(f, "No {} found in the catalog with id '{}'", kind, id)
            }
            Self::Http { source } => {
                write!(f, "Catalog request failed: {}", source)
            }
            Self::Malformed { kind, id, detail } => {
                write!(f, "Catalog response for {} '{}' is malformed: {}", kind, id, detail)
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http { source } => Some(source),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Http { source: err }
    }
}
