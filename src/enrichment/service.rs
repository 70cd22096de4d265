//! Enrichment orchestration
//!
//! `EnrichmentService` holds the credential context and the two external
//! clients, and walks one enrichment call through its stages: prepare,
//! upload, group, query, merge. All remote I/O is sequential and blocking.
//! The temporary uploaded table is not cleaned up on failure; its lifecycle
//! belongs to the warehouse.

use polars::prelude::*;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::catalog::{CatalogClient, CatalogError, Variable};
use crate::credentials::Credentials;
use crate::warehouse::WarehouseClient;
use super::error::EnrichmentError;
use super::sql::{build_query, TableMetadata};
use super::variables::{
    prepare_filters, prepare_variables, variable_aggregations, AggregationPolicy,
    VariableAggregation, VariableFilter, VariableSpec,
};

/// Synthetic dense join key added to the working DataFrame.
pub const ENRICHMENT_ID: &str = "enrichment_id";
/// Helper column holding the serialized geometry for upload.
pub const GEOJSON_COLUMN: &str = "__geojson_geom";

const PUBLIC_PROJECT: &str = "carto-do-public-data";
const WORKING_PROJECT: &str = "carto-do-customers";
const BACKEND: &str = "bq";

/// Orchestrates the enrichment workflow against the catalog and warehouse.
pub struct EnrichmentService<C, W> {
    credentials: Credentials,
    catalog: C,
    warehouse: W,
    user_dataset: String,
}

impl<C: CatalogClient, W: WarehouseClient> EnrichmentService<C, W> {
    pub fn new(credentials: Credentials, catalog: C, warehouse: W) -> Self {
        let user_dataset = credentials.user_dataset();
        EnrichmentService {
            credentials,
            catalog,
            warehouse,
            user_dataset,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Enrich `df` with the requested variables.
    ///
    /// Variables are validated before anything is uploaded or queried.
    /// The returned DataFrame carries the caller's columns plus one column
    /// per variable; the caller's DataFrame is never mutated.
    pub fn enrich(
        &self,
        df: &DataFrame,
        variables: &[VariableSpec],
        aggregation: &AggregationPolicy,
        filters: &[VariableFilter],
        geom_column: &str,
    ) -> Result<DataFrame, EnrichmentError> {
        let variables = prepare_variables(variables, &self.catalog, BACKEND)?;
        prepare_filters(filters, &self.catalog, BACKEND)?;
        let aggregations = variable_aggregations(&variables, aggregation);

        let data = self.prepare_data(df, geom_column)?;
        let tablename = self.temp_table_name();
        self.upload_data(&tablename, &data)?;

        let metadata = self.tables_metadata(&aggregations)?;
        let queries = self.build_queries(&metadata, filters, &tablename);
        info!(
            variables = variables.len(),
            queries = queries.len(),
            "running enrichment"
        );

        self.execute_enrichment(&queries, data)
    }

    /// Copy the input, normalize the geometry column to compact GeoJSON, and
    /// assign the dense 0..n-1 join key.
    pub fn prepare_data(
        &self,
        df: &DataFrame,
        geom_column: &str,
    ) -> Result<DataFrame, EnrichmentError> {
        if !df.get_column_names().iter().any(|c| *c == geom_column) {
            return Err(EnrichmentError::MissingGeometryColumn {
                column: geom_column.to_string(),
            });
        }

        let geoms = df.column(geom_column)?.str().map_err(|_| {
            EnrichmentError::InvalidGeometry {
                row: 0,
                detail: format!("column '{}' must contain GeoJSON strings", geom_column),
            }
        })?;

        let mut geojson: Vec<String> = Vec::with_capacity(df.height());
        for (row, value) in geoms.into_iter().enumerate() {
            let raw = value.ok_or_else(|| EnrichmentError::InvalidGeometry {
                row,
                detail: "geometry is null".to_string(),
            })?;
            let normalized =
                normalize_geojson(raw).map_err(|detail| EnrichmentError::InvalidGeometry {
                    row,
                    detail,
                })?;
            geojson.push(normalized);
        }

        let mut data = df.clone();
        let ids: Vec<i64> = (0..df.height() as i64).collect();
        data.with_column(Series::new(ENRICHMENT_ID, ids))?;
        data.with_column(Series::new(GEOJSON_COLUMN, geojson))?;
        Ok(data)
    }

    /// A collision-free name for the uploaded geometry table.
    pub fn temp_table_name(&self) -> String {
        format!("temp_{}", Uuid::new_v4().simple())
    }

    /// Upload the (join key, geometry) projection of the working DataFrame.
    pub fn upload_data(&self, tablename: &str, data: &DataFrame) -> Result<(), EnrichmentError> {
        let projection = data.select([ENRICHMENT_ID, GEOJSON_COLUMN])?;
        self.warehouse.upload_dataframe(
            &projection,
            &[(ENRICHMENT_ID, "INTEGER"), (GEOJSON_COLUMN, "GEOGRAPHY")],
            tablename,
            WORKING_PROJECT,
            &self.user_dataset,
        )?;
        Ok(())
    }

    /// Group the requested variables by the physical table they live in and
    /// resolve each group's addressing.
    ///
    /// Grouping is what keeps the query count at one per table no matter how
    /// many variables are requested from it.
    pub fn tables_metadata(
        &self,
        variables: &[VariableAggregation],
    ) -> Result<Vec<TableMetadata>, EnrichmentError> {
        let mut tables: Vec<TableMetadata> = Vec::new();

        for va in variables {
            let table = self.enrichment_table(&va.variable);
            if let Some(entry) = tables.iter_mut().find(|t| t.table == table) {
                entry.variables.push(va.clone());
            } else {
                debug!(table = %table, "resolving enrichment table group");
                tables.push(TableMetadata {
                    dataset: self.table_dataset(&va.variable, &table),
                    geo_table: self.geo_table(&va.variable)?,
                    project: self.project_for(&va.variable).to_string(),
                    table,
                    variables: vec![va.clone()],
                });
            }
        }

        Ok(tables)
    }

    /// One query per grouped table, each joining the uploaded geometries.
    pub fn build_queries(
        &self,
        metadata: &[TableMetadata],
        filters: &[VariableFilter],
        tablename: &str,
    ) -> Vec<String> {
        let data_table = format!("{}.{}.{}", WORKING_PROJECT, self.user_dataset, tablename);

        metadata
            .iter()
            .map(|meta| {
                let table_filters: Vec<VariableFilter> = filters
                    .iter()
                    .filter(|f| self.enrichment_table(&f.variable) == meta.table)
                    .cloned()
                    .collect();
                build_query(meta, &table_filters, &data_table)
            })
            .collect()
    }

    /// Run each query and left-join its result onto the working DataFrame,
    /// then drop the synthetic key and geometry helper.
    pub fn execute_enrichment(
        &self,
        queries: &[String],
        data: DataFrame,
    ) -> Result<DataFrame, EnrichmentError> {
        let mut enriched = data;

        for query in queries {
            let result = self.warehouse.query(query)?;
            // A spatial join can legitimately match nothing; an empty result
            // set arrives without columns and has nothing to merge on.
            if result.width() == 0 {
                debug!(query = %query, "query matched no rows, skipping merge");
                continue;
            }
            enriched = enriched
                .lazy()
                .join(
                    result.lazy(),
                    [col(ENRICHMENT_ID)],
                    [col(ENRICHMENT_ID)],
                    JoinArgs::new(JoinType::Left),
                )
                .collect()?;
        }

        let enriched = enriched.drop(ENRICHMENT_ID)?;
        Ok(enriched.drop(GEOJSON_COLUMN)?)
    }

    /// The table the variable is read from. Private tables are addressed
    /// through the per-user view; public tables directly.
    fn enrichment_table(&self, variable: &Variable) -> String {
        if variable.project_name() == PUBLIC_PROJECT {
            variable.dataset_name().to_string()
        } else {
            format!("view_{}_{}", variable.schema_name(), variable.dataset_name())
        }
    }

    fn table_dataset(&self, variable: &Variable, table: &str) -> String {
        if variable.project_name() == PUBLIC_PROJECT {
            variable.dataset.clone()
        } else {
            format!("{}.{}.{}", WORKING_PROJECT, self.user_dataset, table)
        }
    }

    fn geo_table(&self, variable: &Variable) -> Result<String, EnrichmentError> {
        let dataset = self.catalog.dataset(&variable.dataset)?;

        let parts: Vec<&str> = dataset.geography.split('.').collect();
        let [_, geo_schema, geo_table] = parts.as_slice() else {
            return Err(EnrichmentError::Catalog {
                source: CatalogError::Malformed {
                    kind: "geography",
                    id: dataset.geography.clone(),
                    detail: "expected a <project>.<schema>.<table> id".to_string(),
                },
            });
        };

        if variable.project_name() == PUBLIC_PROJECT {
            Ok(format!("{}.{}.{}", PUBLIC_PROJECT, geo_schema, geo_table))
        } else {
            Ok(format!(
                "{}.{}.view_{}_{}",
                WORKING_PROJECT, self.user_dataset, geo_schema, geo_table
            ))
        }
    }

    fn project_for(&self, variable: &Variable) -> &'static str {
        if variable.project_name() == PUBLIC_PROJECT {
            PUBLIC_PROJECT
        } else {
            WORKING_PROJECT
        }
    }
}

fn normalize_geojson(raw: &str) -> Result<String, String> {
    let value: Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;

    let Some(kind) = value.get("type").and_then(Value::as_str) else {
        return Err("missing GeoJSON 'type' member".to_string());
    };
    match kind {
        "Point" | "MultiPoint" | "LineString" | "MultiLineString" | "Polygon"
        | "MultiPolygon" | "GeometryCollection" => {}
        other => return Err(format!("'{}' is not a GeoJSON geometry type", other)),
    }

    serde_json::to_string(&value).map_err(|e| e.to_string())
}
