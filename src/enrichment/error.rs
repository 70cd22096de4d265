//! Enrichment error types

use std::fmt;

use crate::catalog::CatalogError;
use crate::warehouse::ClientError;

/// Errors that can occur during enrichment
///
/// Validation variants are raised before any remote call. `Catalog` and
/// `Client` wrap remote failures and propagate them unmodified.
#[derive(Debug)]
pub enum EnrichmentError {
    /// The variable's dataset or geography is not provisioned in the
    /// enrichment backend
    NotAvailable { slug: String, backend: String },
    /// The input DataFrame has no column with the given name
    MissingGeometryColumn { column: String },
    /// A geometry value could not be normalized to GeoJSON
    InvalidGeometry { row: usize, detail: String },
    /// Catalog lookup failed
    Catalog { source: CatalogError },
    /// Warehouse query or upload failed
    Client { source: ClientError },
    /// DataFrame manipulation failed
    DataFrame { source: polars::error::PolarsError },
}

impl fmt::Display for EnrichmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAvailable { slug, backend } => {
                write!(
                    f,
                    "The dataset or geography of variable '{}' is not available in '{}' and cannot be used for enrichment",
                    slug, backend
                )
            }
            Self::MissingGeometryColumn { column } => {
                write!(f, "The input DataFrame has no geometry column '{}'", column)
            }
            Self::InvalidGeometry { row, detail } => {
                write!(f, "Row {} does not hold a GeoJSON geometry: {}", row, detail)
            }
            Self::Catalog { source } => write!(f, "{}", source),
            Self::Client { source } => write!(f, "{}", source),
            Self::DataFrame { source } => write!(f, "DataFrame operation failed: {}", source),
        }
    }
}

impl std::error::Error for EnrichmentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Catalog { source } => Some(source),
            Self::Client { source } => Some(source),
            Self::DataFrame { source } => Some(source),
            _ => None,
        }
    }
}

impl From<CatalogError> for EnrichmentError {
    fn from(err: CatalogError) -> Self {
        EnrichmentError::Catalog { source: err }
    }
}

impl From<ClientError> for EnrichmentError {
    fn from(err: ClientError) -> Self {
        EnrichmentError::Client { source: err }
    }
}

impl From<polars::error::PolarsError> for EnrichmentError {
    fn from(err: polars::error::PolarsError) -> Self {
        EnrichmentError::DataFrame { source: err }
    }
}
