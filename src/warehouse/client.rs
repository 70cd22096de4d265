//! Warehouse client
//!
//! Blocking, sequential remote calls. Failures propagate unmodified; there
//! is no retry and no partial-result recovery.

use polars::prelude::DataFrame;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::credentials::Credentials;
use super::dataframe::{dataframe_from_rows, rows_from_dataframe};
use super::error::ClientError;

/// The two warehouse operations the enrichment pipeline needs.
pub trait WarehouseClient {
    /// Run a SQL statement and return the result rows as a DataFrame.
    fn query(&self, sql: &str) -> Result<DataFrame, ClientError>;

    /// Write a DataFrame as a new table `<project>.<dataset>.<tablename>`.
    ///
    /// `schema` maps column names to warehouse column types, e.g.
    /// `("enrichment_id", "INTEGER")`.
    fn upload_dataframe(
        &self,
        df: &DataFrame,
        schema: &[(&str, &str)],
        tablename: &str,
        project: &str,
        dataset: &str,
    ) -> Result<(), ClientError>;
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    rows: Vec<serde_json::Value>,
    #[serde(default)]
    error: Option<Vec<String>>,
}

/// Warehouse client backed by the platform's SQL API.
pub struct SqlApiClient {
    credentials: Credentials,
    http: Client,
}

impl SqlApiClient {
    pub fn new(credentials: Credentials) -> Self {
        SqlApiClient {
            credentials,
            http: Client::new(),
        }
    }
}

impl WarehouseClient for SqlApiClient {
    fn query(&self, sql: &str) -> Result<DataFrame, ClientError> {
        let url = format!("{}/api/v2/sql", self.credentials.base_url());
        debug!(bytes = sql.len(), "executing warehouse query");

        let response: QueryResponse = self
            .http
            .post(&url)
            .json(&json!({
                "q": sql,
                "api_key": self.credentials.api_key,
            }))
            .send()?
            .error_for_status()?
            .json()
            .map_err(|e| ClientError::Malformed {
                detail: e.to_string(),
            })?;

        if let Some(errors) = response.error {
            return Err(ClientError::Sql {
                message: errors.join("; "),
            });
        }

        dataframe_from_rows(&response.rows)
    }

    fn upload_dataframe(
        &self,
        df: &DataFrame,
        schema: &[(&str, &str)],
        tablename: &str,
        project: &str,
        dataset: &str,
    ) -> Result<(), ClientError> {
        let url = format!(
            "{}/api/v4/warehouse/{}/{}/{}/import",
            self.credentials.base_url(),
            project,
            dataset,
            tablename
        );

        let schema_json: serde_json::Map<String, serde_json::Value> = schema
            .iter()
            .map(|(col, ty)| (col.to_string(), json!(ty)))
            .collect();

        let rows = rows_from_dataframe(df)?;
        info!(tablename, rows = rows.len(), "uploading enrichment table");

        let response = self
            .http
            .post(&url)
            .query(&[("api_key", self.credentials.api_key.as_str())])
            .json(&json!({
                "schema": schema_json,
                "rows": rows,
            }))
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(ClientError::Upload {
                tablename: tablename.to_string(),
                message: format!("{}: {}", status, body),
            });
        }

        Ok(())
    }
}
