//! geoenrich - Enrich geospatial dataframes and publish interactive maps
//!
//! This library provides:
//! - Catalog entity types (Variable, Dataset, Geography) and a catalog client
//! - Variable preparation (string-or-object resolution, availability checks)
//! - Enrichment query construction and execution against a SQL warehouse
//! - Declarative map assembly (Source, Layer, Map) rendered to an HTML bundle
//! - Publication of rendered maps to the hosted viewer (kuviz)
//!
//! # Architecture
//!
//! **Noun modules** (data structures and clients):
//! - `credentials` - explicit credential context passed through all calls
//! - `catalog/` - catalog entities and the metadata lookup client
//! - `warehouse/` - warehouse client trait, SQL API implementation, result
//!   set → DataFrame conversion
//!
//! **Verb modules** (transformations):
//! - `enrichment/` - Variables + DataFrame → enriched DataFrame
//! - `viz/` - Sources + Layers → Map → HTML, and kuviz publication
//!
//! # Example
//!
//! ```ignore
//! use geoenrich::{Credentials, EnrichmentService, VariableSpec, AggregationPolicy};
//!
//! let creds = Credentials::new("analyst", "api-key");
//! let service = EnrichmentService::new(creds, catalog, warehouse);
//! let enriched = service.enrich(
//!     &df,
//!     &[VariableSpec::id("carto-do.acs.sociodemo.population")],
//!     &AggregationPolicy::Default,
//!     &[],
//!     "geometry",
//! )?;
//! ```

pub mod catalog;
pub mod credentials;
pub mod enrichment;
pub mod viz;
pub mod warehouse;

// Re-export commonly used types
pub use catalog::{CatalogClient, CatalogError, Dataset, Geography, Variable};
pub use credentials::Credentials;
pub use enrichment::{
    prepare_filters, prepare_variables, variable_aggregations, AggregationPolicy,
    EnrichmentError, EnrichmentService, VariableAggregation, VariableFilter, VariableSpec,
};
pub use viz::{
    Bounds, Kuviz, KuvizPublisher, Layer, Map, Popup, PopupAttr, PublishError, Source, VizError,
};
pub use warehouse::{ClientError, SqlApiClient, WarehouseClient};
