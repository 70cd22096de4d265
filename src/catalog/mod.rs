//! Catalog entities and metadata lookups
//!
//! The catalog is a read-only metadata service describing the datasets,
//! geographies, and variables available for enrichment. Entities are fetched
//! by id and expose which warehouse backends they are available in.

mod client;
mod entities;
mod error;

pub use client::{CatalogClient, HttpCatalog};
pub use entities::{Dataset, Geography, Variable};
pub use error::CatalogError;
