//! Shared test fixtures: an in-memory catalog and a recording warehouse

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use polars::prelude::DataFrame;

use geoenrich::catalog::{CatalogClient, CatalogError, Dataset, Geography, Variable};
use geoenrich::warehouse::{ClientError, WarehouseClient};

/// Route library logs to the test writer; `RUST_LOG` overrides the default.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geoenrich=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Catalog backed by maps, loaded with whatever the test needs.
#[derive(Clone, Default)]
pub struct MemoryCatalog {
    variables: HashMap<String, Variable>,
    datasets: HashMap<String, Dataset>,
    geographies: HashMap<String, Geography>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.insert(variable.id.clone(), variable);
        self
    }

    pub fn with_dataset(mut self, dataset: Dataset) -> Self {
        self.datasets.insert(dataset.id.clone(), dataset);
        self
    }

    pub fn with_geography(mut self, geography: Geography) -> Self {
        self.geographies.insert(geography.id.clone(), geography);
        self
    }
}

impl CatalogClient for MemoryCatalog {
    fn variable(&self, id: &str) -> Result<Variable, CatalogError> {
        self.variables.get(id).cloned().ok_or_else(|| CatalogError::NotFound {
            kind: "variable",
            id: id.to_string(),
        })
    }

    fn dataset(&self, id: &str) -> Result<Dataset, CatalogError> {
        self.datasets.get(id).cloned().ok_or_else(|| CatalogError::NotFound {
            kind: "dataset",
            id: id.to_string(),
        })
    }

    fn geography(&self, id: &str) -> Result<Geography, CatalogError> {
        self.geographies.get(id).cloned().ok_or_else(|| CatalogError::NotFound {
            kind: "geography",
            id: id.to_string(),
        })
    }
}

/// One recorded upload call.
#[derive(Clone)]
#[allow(dead_code)]
pub struct Upload {
    pub tablename: String,
    pub project: String,
    pub dataset: String,
    pub columns: Vec<String>,
    pub rows: usize,
}

#[derive(Default)]
struct WarehouseState {
    queries: Vec<String>,
    uploads: Vec<Upload>,
    results: VecDeque<DataFrame>,
}

/// Warehouse fake that records every call and replays queued query results.
///
/// Clones share state, so a test can keep a handle after moving one clone
/// into the service under test.
#[derive(Clone, Default)]
pub struct RecordingWarehouse {
    state: Rc<RefCell<WarehouseState>>,
}

impl RecordingWarehouse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result for the next query, in call order.
    pub fn push_result(&self, df: DataFrame) {
        self.state.borrow_mut().results.push_back(df);
    }

    pub fn queries(&self) -> Vec<String> {
        self.state.borrow().queries.clone()
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.state.borrow().uploads.clone()
    }

    /// Total remote calls seen, queries and uploads together.
    pub fn call_count(&self) -> usize {
        let state = self.state.borrow();
        state.queries.len() + state.uploads.len()
    }
}

impl WarehouseClient for RecordingWarehouse {
    fn query(&self, sql: &str) -> Result<DataFrame, ClientError> {
        let mut state = self.state.borrow_mut();
        state.queries.push(sql.to_string());
        state.results.pop_front().ok_or(ClientError::Sql {
            message: "no queued result for query".to_string(),
        })
    }

    fn upload_dataframe(
        &self,
        df: &DataFrame,
        _schema: &[(&str, &str)],
        tablename: &str,
        project: &str,
        dataset: &str,
    ) -> Result<(), ClientError> {
        self.state.borrow_mut().uploads.push(Upload {
            tablename: tablename.to_string(),
            project: project.to_string(),
            dataset: dataset.to_string(),
            columns: df.get_column_names().iter().map(|s| s.to_string()).collect(),
            rows: df.height(),
        });
        Ok(())
    }
}

// =============================================================================
// Catalog fixtures
// =============================================================================

pub const PUBLIC_DATASET: &str = "carto-do-public-data.acs.sociodemo";
pub const PUBLIC_GEOGRAPHY: &str = "carto-do-public-data.acs.blockgroups";
pub const PRIVATE_DATASET: &str = "carto-do.ags.retail";
pub const PRIVATE_GEOGRAPHY: &str = "carto-do.ags.blocks";

pub fn public_variable(column: &str, agg: Option<&str>) -> Variable {
    Variable {
        id: format!("{}.{}", PUBLIC_DATASET, column),
        slug: format!("{}_pub", column),
        column_name: column.to_string(),
        dataset: PUBLIC_DATASET.to_string(),
        agg_method: agg.map(|a| a.to_string()),
    }
}

pub fn private_variable(column: &str, agg: Option<&str>) -> Variable {
    Variable {
        id: format!("{}.{}", PRIVATE_DATASET, column),
        slug: format!("{}_priv", column),
        column_name: column.to_string(),
        dataset: PRIVATE_DATASET.to_string(),
        agg_method: agg.map(|a| a.to_string()),
    }
}

/// A catalog where both fixture datasets are provisioned in the enrichment
/// backend.
pub fn available_catalog() -> MemoryCatalog {
    MemoryCatalog::new()
        .with_dataset(Dataset {
            id: PUBLIC_DATASET.to_string(),
            geography: PUBLIC_GEOGRAPHY.to_string(),
            available_in: vec!["bq".to_string()],
        })
        .with_geography(Geography {
            id: PUBLIC_GEOGRAPHY.to_string(),
            available_in: vec!["bq".to_string()],
        })
        .with_dataset(Dataset {
            id: PRIVATE_DATASET.to_string(),
            geography: PRIVATE_GEOGRAPHY.to_string(),
            available_in: vec!["bq".to_string()],
        })
        .with_geography(Geography {
            id: PRIVATE_GEOGRAPHY.to_string(),
            available_in: vec!["bq".to_string()],
        })
}
