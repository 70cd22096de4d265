//! Enrichment pipeline
//!
//! Turns a geometry DataFrame plus a list of catalog variables into an
//! enriched DataFrame:
//!
//! 1. `variables` - resolve id-or-object specs, validate availability,
//!    resolve effective aggregations
//! 2. `service::prepare_data` - copy, normalize geometry, assign join key
//! 3. `service::upload_data` - write the (key, geometry) projection to a
//!    uniquely named temporary table
//! 4. `service::tables_metadata` + `sql` - one query per physical table,
//!    batching every variable that lives in it
//! 5. `service::execute_enrichment` - run queries, left-join results back,
//!    drop the helper columns

mod error;
mod service;
mod sql;
mod variables;

pub use error::EnrichmentError;
pub use service::{EnrichmentService, ENRICHMENT_ID, GEOJSON_COLUMN};
pub use sql::{build_query, TableMetadata};
pub use variables::{
    prepare_filters, prepare_variables, variable_aggregations, AggregationPolicy,
    VariableAggregation, VariableFilter, VariableSpec, DEFAULT_AGGREGATION,
};
